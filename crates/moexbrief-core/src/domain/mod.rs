//! # Domain Models
//!
//! Types flowing through the pipeline, from index composition to the
//! per-ticker records consumed by the report.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Ticker`] | Validated exchange symbol |
//! | [`IndexSnapshot`] | Filtered index composition |
//! | [`MetricsTable`] / [`MetricRow`] | Selected financial line items |
//! | [`Factors`] | Pros and cons commentary |
//! | [`Price`] | Exchange price as reported |
//! | [`TickerReport`] | All data for one ticker |
//! | [`Portfolio`] | Ordered per-ticker reports |

mod models;
mod ticker;

pub use models::{
    Factors, IndexSnapshot, MetricRow, MetricsTable, Portfolio, Price, TickerMetrics, TickerReport,
};
pub use ticker::Ticker;
