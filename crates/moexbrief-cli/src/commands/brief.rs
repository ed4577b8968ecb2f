use std::path::Path;

use moexbrief_core::{Brief, Pipeline, PromptTemplate, ReportDate};
use tracing::info;

use crate::cli::BriefArgs;
use crate::error::CliError;

pub async fn run(args: &BriefArgs, pipeline: &Pipeline) -> Result<(), CliError> {
    let date = match args.date.as_deref() {
        Some(raw) => ReportDate::parse(raw)?,
        None => ReportDate::today(),
    };
    let template = match args.template.as_deref() {
        Some(path) => load_template(path).await?,
        None => PromptTemplate::default(),
    };

    let brief = pipeline.run(date, &template).await?;

    if !args.quiet {
        println!("{}", brief.body);
    }
    write_outputs(args, &brief).await
}

async fn load_template(path: &Path) -> Result<PromptTemplate, CliError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|error| CliError::io("failed to read template", path, error))?;
    Ok(PromptTemplate::parse(text)?)
}

async fn write_outputs(args: &BriefArgs, brief: &Brief) -> Result<(), CliError> {
    tokio::fs::write(&args.output, &brief.prompt)
        .await
        .map_err(|error| CliError::io("failed to write prompt", &args.output, error))?;
    info!(
        path = %args.output.display(),
        tickers = brief.portfolio.len(),
        skipped = brief.portfolio.skipped.len(),
        "prompt written"
    );

    if let Some(path) = args.json_out.as_deref() {
        let json = brief.to_json_pretty()?;
        tokio::fs::write(path, json)
            .await
            .map_err(|error| CliError::io("failed to write json", path, error))?;
        info!(path = %path.display(), "json written");
    }
    Ok(())
}
