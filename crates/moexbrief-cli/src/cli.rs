//! CLI argument definitions for moexbrief.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `brief` | Full run: key rate, index, per-ticker data, prompt file (default) |
//! | `tickers` | Print the filtered index composition |
//! | `price` | Print the latest price of one ticker |
//! | `metrics` | Print the report block of one ticker |
//! | `key-rate` | Print the central bank key rate |
//!
//! # Examples
//!
//! ```bash
//! # Write prompt.txt for today
//! moexbrief
//!
//! # Custom template, skip tickers whose pages fail
//! moexbrief brief --template prompt.tmpl --skip-failed --output out/prompt.txt
//!
//! # One ticker
//! moexbrief metrics SBER
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "moexbrief",
    author,
    version,
    about = "Build an LLM prompt from MOEX index fundamentals, prices and the key rate"
)]
pub struct Cli {
    /// Raise log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Minimum delay between consecutive tickers in milliseconds; 0 disables it.
    #[arg(long, global = true, default_value_t = 500)]
    pub delay_ms: u64,

    /// Index whose constituents are processed.
    #[arg(long, global = true, default_value = "IMOEX")]
    pub index: String,

    /// Maximum number of constituents requested from the exchange.
    #[arg(long, global = true, default_value_t = 100)]
    pub limit: u32,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline and write the prompt file.
    Brief(BriefArgs),
    /// Print the index composition after exclusions.
    Tickers,
    /// Print the latest price for a ticker.
    Price(TickerArgs),
    /// Print the rendered metrics block for a ticker.
    Metrics(TickerArgs),
    /// Print the central bank key rate.
    KeyRate,
}

#[derive(Debug, Clone, Args)]
pub struct BriefArgs {
    /// Prompt output file.
    #[arg(short, long, default_value = "prompt.txt")]
    pub output: PathBuf,

    /// Template file with {date}, {key_rate}, {tickers} and {report} placeholders.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Report date as DD.MM.YYYY instead of today.
    #[arg(long)]
    pub date: Option<String>,

    /// Log and skip tickers that fail instead of aborting.
    #[arg(long, default_value_t = false)]
    pub skip_failed: bool,

    /// Also write the collected data as JSON.
    #[arg(long)]
    pub json_out: Option<PathBuf>,

    /// Do not echo the report body to stdout.
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}

impl Default for BriefArgs {
    fn default() -> Self {
        Self {
            output: PathBuf::from("prompt.txt"),
            template: None,
            date: None,
            skip_failed: false,
            json_out: None,
            quiet: false,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct TickerArgs {
    /// Exchange ticker, e.g. SBER.
    pub ticker: String,
}
