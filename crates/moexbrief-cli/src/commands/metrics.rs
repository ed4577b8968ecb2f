use moexbrief_core::{Pipeline, Ticker, TickerReport};

use crate::cli::TickerArgs;
use crate::error::CliError;

/// Renders the same block `brief` would produce for this ticker alone.
pub async fn run(args: &TickerArgs, pipeline: &Pipeline) -> Result<(), CliError> {
    let ticker = Ticker::parse(&args.ticker)?;
    let metrics = pipeline.scraper().metrics(&ticker).await?;
    let price = pipeline.moex().price(&ticker).await?;

    let report = TickerReport::new(ticker, metrics, price);
    print!("{}", pipeline.composer().render_ticker(1, 1, &report));
    Ok(())
}
