use moexbrief_core::{Pipeline, Ticker};

use crate::cli::TickerArgs;
use crate::error::CliError;

pub async fn run(args: &TickerArgs, pipeline: &Pipeline) -> Result<(), CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let price = pipeline.moex().price(&ticker).await?;
    println!("{ticker}: {price}");
    Ok(())
}
