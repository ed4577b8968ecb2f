use std::sync::Arc;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::adapters::fetch_body;
use crate::config::{ticker_url, IndexConfig, PriceConfig};
use crate::data_source::{PriceSource, SourceFuture};
use crate::http_client::{HttpClient, HttpRequest};
use crate::{IndexSnapshot, Price, SourceError, SourceId, Ticker};

/// MOEX ISS adapter: index composition and board prices.
#[derive(Clone)]
pub struct MoexAdapter {
    http_client: Arc<dyn HttpClient>,
    index: IndexConfig,
    price: PriceConfig,
}

impl MoexAdapter {
    pub fn new(http_client: Arc<dyn HttpClient>) -> Self {
        Self::with_config(http_client, IndexConfig::default(), PriceConfig::default())
    }

    pub fn with_config(
        http_client: Arc<dyn HttpClient>,
        index: IndexConfig,
        price: PriceConfig,
    ) -> Self {
        Self {
            http_client,
            index,
            price,
        }
    }

    /// Current index composition with duplicates collapsed and exclusions removed.
    pub async fn index_snapshot(&self) -> Result<IndexSnapshot, SourceError> {
        info!(index = %self.index.index, "requesting index composition");

        let request = HttpRequest::get(self.index.url())
            .with_query("limit", self.index.limit.to_string())
            .with_timeout_ms(self.index.timeout_ms);
        let body = fetch_body(self.http_client.as_ref(), SourceId::Moex, request).await?;

        let raw = parse_index_tickers(&body)?;
        let snapshot = IndexSnapshot::from_raw(raw, &self.index.exclusions);

        info!(
            index = %self.index.index,
            found = snapshot.len() + snapshot.excluded.len(),
            kept = snapshot.len(),
            "index composition received"
        );
        for ticker in &snapshot.excluded {
            warn!(%ticker, "dropping excluded ticker: not served by the board endpoint");
        }

        Ok(snapshot)
    }

    /// Last traded price, falling back to the previous close.
    pub async fn price(&self, ticker: &Ticker) -> Result<Price, SourceError> {
        let request = HttpRequest::get(ticker_url(&self.price.url_template, ticker.as_str()))
            .with_query("iss.meta", "off")
            .with_query("iss.only", "marketdata")
            .with_timeout_ms(self.price.timeout_ms);
        let body = fetch_body(self.http_client.as_ref(), SourceId::Moex, request).await?;

        let price = parse_market_price(&body, ticker)?;
        debug!(%ticker, %price, "price received");
        Ok(price)
    }
}

impl PriceSource for MoexAdapter {
    fn price<'a>(&'a self, ticker: &'a Ticker) -> SourceFuture<'a, Price> {
        Box::pin(MoexAdapter::price(self, ticker))
    }
}

/// Column-oriented block used by every ISS JSON response.
#[derive(Debug, Deserialize)]
struct IssTable {
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
}

impl IssTable {
    fn column(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == name)
    }
}

#[derive(Debug, Deserialize)]
struct AnalyticsResponse {
    analytics: IssTable,
}

#[derive(Debug, Deserialize)]
struct MarketDataResponse {
    marketdata: Option<IssTable>,
}

fn parse_index_tickers(body: &str) -> Result<Vec<Ticker>, SourceError> {
    let response: AnalyticsResponse = serde_json::from_str(body).map_err(|e| {
        SourceError::decode(
            SourceId::Moex,
            format!("failed to parse index analytics: {e}"),
        )
    })?;
    let table = response.analytics;

    let ticker_idx = table.column("ticker").ok_or_else(|| {
        SourceError::decode(SourceId::Moex, "index analytics has no 'ticker' column")
    })?;

    table
        .data
        .iter()
        .enumerate()
        .map(|(row_idx, row)| {
            let raw = row.get(ticker_idx).and_then(Value::as_str).ok_or_else(|| {
                SourceError::decode(
                    SourceId::Moex,
                    format!("index analytics row {row_idx} has no ticker string"),
                )
            })?;
            Ticker::parse(raw).map_err(|e| {
                SourceError::decode(
                    SourceId::Moex,
                    format!("index analytics row {row_idx}: {e}"),
                )
            })
        })
        .collect()
}

fn parse_market_price(body: &str, ticker: &Ticker) -> Result<Price, SourceError> {
    let response: MarketDataResponse = serde_json::from_str(body).map_err(|e| {
        SourceError::decode(
            SourceId::Moex,
            format!("failed to parse market data for {ticker}: {e}"),
        )
    })?;

    let missing = || {
        SourceError::incomplete(
            SourceId::Moex,
            format!("price retrieval error: no LAST or PREVPRICE for {ticker}"),
        )
    };

    let table = response.marketdata.ok_or_else(missing)?;
    let row = table.data.first().ok_or_else(missing)?;

    ["LAST", "PREVPRICE"]
        .into_iter()
        .filter_map(|field| table.column(field))
        .find_map(|idx| row.get(idx).and_then(price_text))
        .map(Price::new)
        .ok_or_else(missing)
}

/// Numbers keep their JSON rendering so `148.0` stays `"148.0"`.
fn price_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}
