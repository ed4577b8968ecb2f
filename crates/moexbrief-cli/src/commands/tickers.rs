use moexbrief_core::Pipeline;

use crate::error::CliError;

pub async fn run(pipeline: &Pipeline) -> Result<(), CliError> {
    let snapshot = pipeline.moex().index_snapshot().await?;
    for ticker in &snapshot.tickers {
        println!("{ticker}");
    }
    Ok(())
}
