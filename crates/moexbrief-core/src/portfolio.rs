use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{FailurePolicy, PortfolioConfig};
use crate::data_source::{MetricsSource, PriceSource};
use crate::throttling::Pacer;
use crate::{Portfolio, SourceError, Ticker, TickerReport};

/// Sequential per-ticker collection: metrics first, then price.
#[derive(Clone)]
pub struct PortfolioBuilder {
    metrics: Arc<dyn MetricsSource>,
    prices: Arc<dyn PriceSource>,
    pacer: Pacer,
    failure_policy: FailurePolicy,
}

impl PortfolioBuilder {
    pub fn new(metrics: Arc<dyn MetricsSource>, prices: Arc<dyn PriceSource>) -> Self {
        Self::with_config(metrics, prices, &PortfolioConfig::default())
    }

    pub fn with_config(
        metrics: Arc<dyn MetricsSource>,
        prices: Arc<dyn PriceSource>,
        config: &PortfolioConfig,
    ) -> Self {
        Self {
            metrics,
            prices,
            pacer: Pacer::new(config.pacing),
            failure_policy: config.failure_policy,
        }
    }

    /// Collects one [`TickerReport`] per ticker, in input order.
    ///
    /// # Errors
    ///
    /// Under [`FailurePolicy::Abort`] the first failing ticker aborts the
    /// pass and its error is returned. Under [`FailurePolicy::Skip`] failures
    /// are logged and the ticker is recorded in [`Portfolio::skipped`].
    pub async fn build(&self, tickers: &[Ticker]) -> Result<Portfolio, SourceError> {
        let total = tickers.len();
        info!(total, "scanning portfolio");

        let mut portfolio = Portfolio {
            reports: Vec::with_capacity(total),
            skipped: Vec::new(),
        };

        for (idx, ticker) in tickers.iter().enumerate() {
            self.pacer.wait().await;
            info!(%ticker, "[{}/{}] collecting", idx + 1, total);

            match self.collect(ticker).await {
                Ok(report) => portfolio.reports.push(report),
                Err(error) => match self.failure_policy {
                    FailurePolicy::Abort => return Err(error),
                    FailurePolicy::Skip => {
                        warn!(%ticker, %error, "skipping ticker");
                        portfolio.skipped.push(ticker.clone());
                    }
                },
            }
        }

        Ok(portfolio)
    }

    async fn collect(&self, ticker: &Ticker) -> Result<TickerReport, SourceError> {
        let metrics = self.metrics.metrics(ticker).await?;
        let price = self.prices.price(ticker).await?;
        Ok(TickerReport::new(ticker.clone(), metrics, price))
    }
}
