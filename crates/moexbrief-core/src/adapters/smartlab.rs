use std::sync::Arc;

use regex::Regex;
use scraper::Html;
use tracing::{info, warn};

use crate::adapters::fetch_body;
use crate::config::{ticker_url, MetricsConfig};
use crate::data_source::{MetricsSource, SourceFuture};
use crate::html::{class_selector, collapsed_text, extract_tables, selector};
use crate::http_client::{HttpClient, HttpRequest};
use crate::metrics::{HeaderDetection, MetricsNormalizer};
use crate::{Factors, SourceError, SourceId, Ticker, TickerMetrics, ValidationError};

/// Scraper for per-ticker financial-summary pages.
#[derive(Clone)]
pub struct SmartLabScraper {
    http_client: Arc<dyn HttpClient>,
    config: MetricsConfig,
    table_marker: Regex,
    normalizer: MetricsNormalizer,
}

impl SmartLabScraper {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Result<Self, ValidationError> {
        Self::with_config(http_client, MetricsConfig::default())
    }

    pub fn with_config(
        http_client: Arc<dyn HttpClient>,
        config: MetricsConfig,
    ) -> Result<Self, ValidationError> {
        let table_marker =
            Regex::new(&config.table_marker).map_err(|e| ValidationError::InvalidTableMarker {
                message: e.to_string(),
            })?;
        let normalizer = MetricsNormalizer::from_config(&config);

        Ok(Self {
            http_client,
            config,
            table_marker,
            normalizer,
        })
    }

    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }

    /// Fetches the page for `ticker` and extracts its key metrics and factors.
    pub async fn metrics(&self, ticker: &Ticker) -> Result<TickerMetrics, SourceError> {
        info!(%ticker, "requesting financial summary");

        let request = HttpRequest::get(ticker_url(&self.config.url_template, ticker.as_str()))
            .with_header("user-agent", self.config.user_agent.as_str())
            .with_timeout_ms(self.config.timeout_ms);
        let body = fetch_body(self.http_client.as_ref(), SourceId::SmartLab, request).await?;

        self.parse_page(&body, ticker)
    }

    /// Extracts metrics and factors from an already fetched page.
    pub fn parse_page(&self, body: &str, ticker: &Ticker) -> Result<TickerMetrics, SourceError> {
        let document = Html::parse_document(body);

        let table = extract_tables(&document)?
            .into_iter()
            .find(|(text, _)| self.table_marker.is_match(text))
            .map(|(_, table)| table)
            .ok_or_else(|| {
                SourceError::not_found(
                    SourceId::SmartLab,
                    format!(
                        "no table matching '{}' on the page for {ticker}",
                        self.table_marker.as_str()
                    ),
                )
            })?;

        let (table, detection) = self.normalizer.normalize(&table);
        if detection == HeaderDetection::NotFound {
            warn!(%ticker, "period header row not found, using positional columns");
        }

        let factors = self.parse_factors(&document)?;

        Ok(TickerMetrics { table, factors })
    }

    fn parse_factors(&self, document: &Html) -> Result<Factors, SourceError> {
        Ok(Factors {
            pros: self.section_items(document, &self.config.pros_class)?,
            cons: self.section_items(document, &self.config.cons_class)?,
        })
    }

    /// List item texts of the first `div.{class}`; empty when the section is absent.
    fn section_items(&self, document: &Html, class: &str) -> Result<Vec<String>, SourceError> {
        let section_sel = class_selector("div", class, SourceId::SmartLab)?;
        let item_sel = selector("li", SourceId::SmartLab)?;

        Ok(document
            .select(&section_sel)
            .next()
            .map(|section| section.select(&item_sel).map(collapsed_text).collect())
            .unwrap_or_default())
    }
}

impl MetricsSource for SmartLabScraper {
    fn metrics<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, TickerMetrics> {
        Box::pin(SmartLabScraper::metrics(self, ticker))
    }
}
