use moexbrief_core::Pipeline;

use crate::error::CliError;

pub async fn run(pipeline: &Pipeline) -> Result<(), CliError> {
    let rate = pipeline.cbr().key_rate().await?;
    println!("{rate}");
    Ok(())
}
