//! Named defaults for every upstream the pipeline touches.
//!
//! Each component receives its own config struct at construction, so tests
//! can point URLs at fixtures or swap keyword and exclusion lists.

use std::time::Duration;

/// Preferred-share classes the ISS board endpoint does not serve.
pub const EXCLUDED_TICKERS: [&str; 3] = ["SBERP", "SNGSP", "TATNP"];

/// Label fragments of the metric rows worth keeping.
pub const KEY_METRICS: [&str; 13] = [
    "Чистая прибыль",
    "OIBDA",
    "EBITDA",
    "Чистый долг",
    "Net Debt",
    "Наличность",
    "Cash",
    "ROE",
    "P/E",
    "Дивиденд",
    "FCF",
    "EPS",
    "Свободный денежный",
];

pub const BROWSER_USER_AGENT: &str = concat!(
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
    "AppleWebKit/537.36 (KHTML, like Gecko) ",
    "Chrome/120.0.0.0 Safari/537.36",
);

pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// Index constituents endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    /// URL template with an `{index}` placeholder.
    pub url_template: String,
    pub index: String,
    pub limit: u32,
    pub exclusions: Vec<String>,
    pub timeout_ms: u64,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            url_template: String::from(
                "https://iss.moex.com/iss/statistics/engines/stock/markets/index/analytics/{index}.json",
            ),
            index: String::from("IMOEX"),
            limit: 100,
            exclusions: EXCLUDED_TICKERS.iter().map(|s| s.to_string()).collect(),
            timeout_ms: 10_000,
        }
    }
}

impl IndexConfig {
    pub fn url(&self) -> String {
        self.url_template.replace("{index}", &urlencoding::encode(&self.index))
    }
}

/// Market-data endpoint for a single security.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceConfig {
    /// URL template with a `{ticker}` placeholder.
    pub url_template: String,
    pub timeout_ms: u64,
}

impl Default for PriceConfig {
    fn default() -> Self {
        Self {
            url_template: String::from(
                "https://iss.moex.com/iss/engines/stock/markets/shares/boards/TQBR/securities/{ticker}.json",
            ),
            timeout_ms: 5_000,
        }
    }
}

/// Central bank front page holding the key rate indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRateConfig {
    pub url: String,
    pub user_agent: String,
    pub block_class: String,
    pub label: String,
    pub value_class: String,
    pub timeout_ms: u64,
}

impl Default for KeyRateConfig {
    fn default() -> Self {
        Self {
            url: String::from("https://www.cbr.ru/"),
            user_agent: String::from(BROWSER_USER_AGENT),
            block_class: String::from("main-indicator"),
            label: String::from("Ключевая ставка"),
            value_class: String::from("main-indicator_value"),
            timeout_ms: 10_000,
        }
    }
}

/// Financial-summary pages and the cleanup rules applied to their tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricsConfig {
    /// URL template with a `{ticker}` placeholder.
    pub url_template: String,
    pub user_agent: String,
    pub timeout_ms: u64,
    /// Pattern a table's text must match to be considered.
    pub table_marker: String,
    /// Substrings identifying the period header row.
    pub header_markers: Vec<String>,
    pub header_scan_rows: usize,
    pub keywords: Vec<String>,
    /// Columns whose header contains this are parser noise.
    pub noise_marker: String,
    pub pros_class: String,
    pub cons_class: String,
    /// Site name printed above the pros/cons in the report.
    pub source_label: String,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            url_template: String::from("https://smart-lab.ru/q/{ticker}/f/q/MSFO/"),
            user_agent: String::from(BROWSER_USER_AGENT),
            timeout_ms: 10_000,
            table_marker: String::from("202"),
            header_markers: vec![String::from("LTM"), String::from("20")],
            header_scan_rows: 5,
            keywords: KEY_METRICS.iter().map(|s| s.to_string()).collect(),
            noise_marker: String::from("smart-lab.ru"),
            pros_class: String::from("reasons-up"),
            cons_class: String::from("reasons-down"),
            source_label: String::from("smart-lab.ru"),
        }
    }
}

/// What to do when one ticker fails during a portfolio pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// First failure aborts the whole batch.
    #[default]
    Abort,
    /// Log the failure, drop the ticker and continue.
    Skip,
}

/// Portfolio pass settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioConfig {
    /// Minimum spacing between consecutive tickers; zero disables pacing.
    pub pacing: Duration,
    pub failure_policy: FailurePolicy,
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            pacing: DEFAULT_PACING,
            failure_policy: FailurePolicy::Abort,
        }
    }
}

/// Full pipeline configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PipelineConfig {
    pub index: IndexConfig,
    pub price: PriceConfig,
    pub key_rate: KeyRateConfig,
    pub metrics: MetricsConfig,
    pub portfolio: PortfolioConfig,
}

pub(crate) fn ticker_url(template: &str, ticker: &str) -> String {
    template.replace("{ticker}", &urlencoding::encode(ticker))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_published_endpoints() {
        let config = PipelineConfig::default();

        assert_eq!(
            config.index.url(),
            "https://iss.moex.com/iss/statistics/engines/stock/markets/index/analytics/IMOEX.json"
        );
        assert_eq!(config.index.limit, 100);
        assert_eq!(config.index.exclusions, vec!["SBERP", "SNGSP", "TATNP"]);
        assert_eq!(config.price.timeout_ms, 5_000);
        assert_eq!(config.portfolio.pacing, Duration::from_millis(500));
        assert_eq!(config.portfolio.failure_policy, FailurePolicy::Abort);
        assert_eq!(config.metrics.keywords.len(), 13);
    }

    #[test]
    fn ticker_placeholder_is_substituted() {
        let config = MetricsConfig::default();

        assert_eq!(
            ticker_url(&config.url_template, "GAZP"),
            "https://smart-lab.ru/q/GAZP/f/q/MSFO/"
        );
    }
}
