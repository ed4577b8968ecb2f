mod brief;
mod key_rate;
mod metrics;
mod price;
mod tickers;

use std::sync::Arc;
use std::time::Duration;

use moexbrief_core::{FailurePolicy, Pipeline, PipelineConfig, ReqwestHttpClient, Ticker};

use crate::cli::{BriefArgs, Cli, Command};
use crate::error::CliError;

pub async fn run(cli: &Cli) -> Result<(), CliError> {
    let default_brief = BriefArgs::default();
    let command = cli.command.as_ref();
    let brief_args = match command {
        Some(Command::Brief(args)) => Some(args),
        None => Some(&default_brief),
        _ => None,
    };

    let config = pipeline_config(cli, brief_args)?;
    let pipeline = Pipeline::new(Arc::new(ReqwestHttpClient::new()), config)?;

    match command {
        None => brief::run(&default_brief, &pipeline).await,
        Some(Command::Brief(args)) => brief::run(args, &pipeline).await,
        Some(Command::Tickers) => tickers::run(&pipeline).await,
        Some(Command::Price(args)) => price::run(args, &pipeline).await,
        Some(Command::Metrics(args)) => metrics::run(args, &pipeline).await,
        Some(Command::KeyRate) => key_rate::run(&pipeline).await,
    }
}

/// Defaults overridden by the global flags and, for `brief`, `--skip-failed`.
fn pipeline_config(cli: &Cli, brief: Option<&BriefArgs>) -> Result<PipelineConfig, CliError> {
    let index = Ticker::parse(&cli.index)?;

    let mut config = PipelineConfig::default();
    config.index.index = index.as_str().to_owned();
    config.index.limit = cli.limit;
    config.portfolio.pacing = Duration::from_millis(cli.delay_ms);
    if brief.is_some_and(|args| args.skip_failed) {
        config.portfolio.failure_policy = FailurePolicy::Skip;
    }
    Ok(config)
}
