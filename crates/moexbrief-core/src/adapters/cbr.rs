use std::sync::Arc;

use scraper::Html;
use tracing::info;

use crate::adapters::fetch_body;
use crate::config::KeyRateConfig;
use crate::html::{class_selector, collapsed_text};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{SourceError, SourceId};

/// Bank of Russia front page adapter.
#[derive(Clone)]
pub struct CbrAdapter {
    http_client: Arc<dyn HttpClient>,
    config: KeyRateConfig,
}

impl CbrAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_config(http_client, KeyRateConfig::default())
    }

    pub fn with_config(http_client: Arc<dyn HttpClient>, config: KeyRateConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    /// Published key rate as displayed, e.g. `16,50%`.
    pub async fn key_rate(&self) -> Result<String, SourceError> {
        let request = HttpRequest::get(self.config.url.as_str())
            .with_header("user-agent", self.config.user_agent.as_str())
            .with_timeout_ms(self.config.timeout_ms);
        let body = fetch_body(self.http_client.as_ref(), SourceId::Cbr, request).await?;

        let rate = self.parse_key_rate(&body)?;
        info!(%rate, "key rate received");
        Ok(rate)
    }

    /// Value of the first indicator block whose text carries the label.
    /// Matching blocks without a value element are skipped.
    pub fn parse_key_rate(&self, body: &str) -> Result<String, SourceError> {
        let document = Html::parse_document(body);
        let block_sel = class_selector("div", &self.config.block_class, SourceId::Cbr)?;
        let value_sel = class_selector("div", &self.config.value_class, SourceId::Cbr)?;
        let label = self.config.label.as_str();

        document
            .select(&block_sel)
            .filter(|block| collapsed_text(*block).contains(label))
            .find_map(|block| block.select(&value_sel).next())
            .map(collapsed_text)
            .ok_or_else(|| {
                SourceError::not_found(SourceId::Cbr, format!("'{label}' indicator not found"))
            })
    }
}
