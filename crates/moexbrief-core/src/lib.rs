//! # moexbrief core
//!
//! Collects the data behind a daily market brief for the MOEX blue-chip
//! index and renders it into a prompt for a text-generation model.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`adapters`] | MOEX ISS, Bank of Russia and smart-lab.ru adapters |
//! | [`config`] | Endpoint templates, exclusion and keyword lists |
//! | [`data_source`] | Per-ticker source traits |
//! | [`domain`] | Tickers, snapshots, metrics tables, reports |
//! | [`error`] | Validation and core errors |
//! | [`http_client`] | HTTP transport abstraction |
//! | [`metrics`] | Metrics table header detection and filtering |
//! | [`pipeline`] | End-to-end run producing a [`Brief`] |
//! | [`portfolio`] | Sequential per-ticker collection |
//! | [`report`] | Report body and prompt rendering |
//! | [`source`] | Upstream identifiers and errors |
//! | [`throttling`] | Pacing between tickers |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌──────────────────────────────────┐
//! │ MoexAdapter  │──▶│ PortfolioBuilder                 │
//! │ (index)      │   │  SmartLabScraper ─▶ MoexAdapter  │
//! └──────────────┘   │  (metrics)          (price)      │
//!                    └────────────────┬─────────────────┘
//! ┌──────────────┐                    ▼
//! │ CbrAdapter   │──────────▶ ReportComposer + PromptTemplate
//! │ (key rate)   │
//! └──────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use moexbrief_core::{MoexAdapter, PortfolioBuilder, ReqwestHttpClient, SmartLabScraper};
//!
//! let http = Arc::new(ReqwestHttpClient::new());
//! let moex = Arc::new(MoexAdapter::new(http.clone()));
//! let scraper = Arc::new(SmartLabScraper::new(http)?);
//!
//! let snapshot = moex.index_snapshot().await?;
//! let portfolio = PortfolioBuilder::new(scraper, moex).build(&snapshot.tickers).await?;
//! ```
//!
//! ## Errors
//!
//! Upstream failures are [`SourceError`]s classified by [`SourceErrorKind`].
//! None are retried: the first failure ends the run unless the portfolio
//! builder runs with [`FailurePolicy::Skip`].

pub mod adapters;
pub mod config;
pub mod data_source;
pub mod domain;
pub mod error;
mod html;
pub mod http_client;
pub mod metrics;
pub mod pipeline;
pub mod portfolio;
pub mod report;
pub mod source;
pub mod throttling;

pub use adapters::{CbrAdapter, MoexAdapter, SmartLabScraper};

pub use config::{
    FailurePolicy, IndexConfig, KeyRateConfig, MetricsConfig, PipelineConfig, PortfolioConfig,
    PriceConfig,
};

pub use data_source::{MetricsSource, PriceSource, SourceFuture};

pub use domain::{
    Factors, IndexSnapshot, MetricRow, MetricsTable, Portfolio, Price, Ticker, TickerMetrics,
    TickerReport,
};

pub use error::{CoreError, ValidationError};

pub use http_client::{
    FixtureHttpClient, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use metrics::{HeaderDetection, MetricsNormalizer, RawTable};

pub use pipeline::{Brief, Pipeline};

pub use portfolio::PortfolioBuilder;

pub use report::{PromptContext, PromptTemplate, ReportComposer, ReportDate};

pub use source::{SourceError, SourceErrorKind, SourceId};

pub use throttling::Pacer;
