use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::http_client::HttpClient;
use crate::report::{PromptContext, PromptTemplate, ReportComposer, ReportDate};
use crate::{
    CbrAdapter, CoreError, IndexSnapshot, MoexAdapter, PipelineConfig, Portfolio, PortfolioBuilder,
    SmartLabScraper,
};

/// Result of a full run.
#[derive(Debug, Clone, Serialize)]
pub struct Brief {
    pub date: ReportDate,
    pub key_rate: String,
    pub snapshot: IndexSnapshot,
    pub portfolio: Portfolio,
    /// Rendered report body, before template substitution.
    #[serde(skip)]
    pub body: String,
    /// Final prompt text.
    #[serde(skip)]
    pub prompt: String,
}

impl Brief {
    pub fn to_json_pretty(&self) -> Result<String, CoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Wires adapters, the portfolio builder and the composer from one config.
#[derive(Clone)]
pub struct Pipeline {
    moex: Arc<MoexAdapter>,
    cbr: CbrAdapter,
    scraper: Arc<SmartLabScraper>,
    builder: PortfolioBuilder,
    composer: ReportComposer,
}

impl Pipeline {
    pub fn new(
        http_client: Arc<dyn HttpClient>,
        config: PipelineConfig,
    ) -> Result<Self, CoreError> {
        let PipelineConfig {
            index,
            price,
            key_rate,
            metrics,
            portfolio,
        } = config;

        let composer = ReportComposer::new(metrics.source_label.clone());
        let moex = Arc::new(MoexAdapter::with_config(http_client.clone(), index, price));
        let cbr = CbrAdapter::with_config(http_client.clone(), key_rate);
        let scraper = Arc::new(SmartLabScraper::with_config(http_client, metrics)?);
        let builder = PortfolioBuilder::with_config(scraper.clone(), moex.clone(), &portfolio);

        Ok(Self {
            moex,
            cbr,
            scraper,
            builder,
            composer,
        })
    }

    pub fn moex(&self) -> &MoexAdapter {
        &self.moex
    }

    pub fn cbr(&self) -> &CbrAdapter {
        &self.cbr
    }

    pub fn scraper(&self) -> &SmartLabScraper {
        &self.scraper
    }

    pub fn composer(&self) -> &ReportComposer {
        &self.composer
    }

    /// Key rate, index composition, per-ticker collection, then rendering.
    pub async fn run(
        &self,
        date: ReportDate,
        template: &PromptTemplate,
    ) -> Result<Brief, CoreError> {
        info!(%date, "building brief");

        let key_rate = self.cbr.key_rate().await?;
        let snapshot = self.moex.index_snapshot().await?;
        let portfolio = self.builder.build(&snapshot.tickers).await?;

        let body = self.composer.render_body(&portfolio);
        let tickers = portfolio.joined();
        let prompt = template.render(&PromptContext {
            date,
            key_rate: &key_rate,
            tickers: &tickers,
            report: &body,
        });

        Ok(Brief {
            date,
            key_rate,
            snapshot,
            portfolio,
            body,
            prompt,
        })
    }
}
