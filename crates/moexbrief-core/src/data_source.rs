//! Per-ticker source contracts driven by the portfolio builder.
//!
//! | Trait | Produces | Implemented by |
//! |-------|----------|----------------|
//! | [`PriceSource`] | [`Price`] | [`MoexAdapter`](crate::adapters::MoexAdapter) |
//! | [`MetricsSource`] | [`TickerMetrics`] | [`SmartLabScraper`](crate::adapters::SmartLabScraper) |
//!
//! Both return boxed futures so implementations can be held as trait objects.

use std::future::Future;
use std::pin::Pin;

use crate::{Price, SourceError, Ticker, TickerMetrics};

pub type SourceFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Latest price lookup for one ticker.
pub trait PriceSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure or when the exchange
    /// reports neither a last nor a previous price.
    fn price<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, Price>;
}

/// Financial metrics and commentary for one ticker.
pub trait MetricsSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SourceError`] on transport failure or when the page does not
    /// contain a recognizable metrics table.
    fn metrics<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, TickerMetrics>;
}
