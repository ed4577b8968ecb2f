use std::collections::HashSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::Ticker;

/// Ordered, duplicate-free index composition with exclusions applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    pub tickers: Vec<Ticker>,
    /// Excluded symbols that were actually present upstream.
    pub excluded: Vec<Ticker>,
}

impl IndexSnapshot {
    /// Collapses duplicates (first occurrence wins) and removes every
    /// ticker listed in `exclusions`.
    pub fn from_raw<I, S>(raw: Vec<Ticker>, exclusions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exclusions: HashSet<String> = exclusions
            .into_iter()
            .map(|value| value.as_ref().trim().to_ascii_uppercase())
            .collect();

        let mut seen = HashSet::new();
        let mut tickers = Vec::with_capacity(raw.len());
        let mut excluded = Vec::new();

        for ticker in raw {
            if !seen.insert(ticker.clone()) {
                continue;
            }
            if exclusions.contains(ticker.as_str()) {
                excluded.push(ticker);
            } else {
                tickers.push(ticker);
            }
        }

        Self { tickers, excluded }
    }

    pub fn len(&self) -> usize {
        self.tickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tickers.is_empty()
    }
}

/// One financial line item across reporting periods.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricRow {
    pub label: String,
    /// One entry per period column; `None` where the source cell was empty.
    pub values: Vec<Option<String>>,
}

/// Filtered metrics table: `columns[0]` is the label column, the rest are periods.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MetricsTable {
    pub columns: Vec<String>,
    pub rows: Vec<MetricRow>,
}

impl MetricsTable {
    pub fn row(&self, label_fragment: &str) -> Option<&MetricRow> {
        let needle = label_fragment.to_lowercase();
        self.rows
            .iter()
            .find(|row| row.label.to_lowercase().contains(&needle))
    }
}

/// Qualitative commentary scraped alongside the metrics.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Factors {
    pub pros: Vec<String>,
    pub cons: Vec<String>,
}

/// Last traded price (or previous close) exactly as the exchange reported it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Scraped metrics and factors for one ticker, before the price is attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMetrics {
    pub table: MetricsTable,
    pub factors: Factors,
}

/// Everything collected for one ticker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerReport {
    pub ticker: Ticker,
    pub table: MetricsTable,
    pub factors: Factors,
    pub price: Price,
}

impl TickerReport {
    pub fn new(ticker: Ticker, metrics: TickerMetrics, price: Price) -> Self {
        Self {
            ticker,
            table: metrics.table,
            factors: metrics.factors,
            price,
        }
    }
}

/// Ordered per-ticker results, aligned with the tickers that were processed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Portfolio {
    pub reports: Vec<TickerReport>,
    /// Tickers dropped under the skip failure policy.
    #[serde(default)]
    pub skipped: Vec<Ticker>,
}

impl Portfolio {
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn tickers(&self) -> Vec<&Ticker> {
        self.reports.iter().map(|report| &report.ticker).collect()
    }

    /// Comma-separated symbols of the reported tickers, as used in the prompt.
    pub fn joined(&self) -> String {
        self.reports
            .iter()
            .map(|report| report.ticker.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    pub fn tables(&self) -> Vec<&MetricsTable> {
        self.reports.iter().map(|report| &report.table).collect()
    }

    pub fn factors(&self) -> Vec<&Factors> {
        self.reports.iter().map(|report| &report.factors).collect()
    }

    pub fn prices(&self) -> Vec<&Price> {
        self.reports.iter().map(|report| &report.price).collect()
    }
}
