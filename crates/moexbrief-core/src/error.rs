use thiserror::Error;

use crate::SourceError;

/// Validation and contract errors exposed by `moexbrief-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,
    #[error("ticker length {len} exceeds max {max}")]
    TickerTooLong { len: usize, max: usize },
    #[error("ticker must start with an ASCII letter: '{ch}'")]
    TickerInvalidStart { ch: char },
    #[error("ticker contains invalid character '{ch}' at index {index}")]
    TickerInvalidChar { ch: char, index: usize },

    #[error("prompt template must contain the {{report}} placeholder")]
    TemplateMissingReport,

    #[error("date must be formatted as DD.MM.YYYY: '{value}'")]
    InvalidReportDate { value: String },

    #[error("table marker is not a valid pattern: {message}")]
    InvalidTableMarker { message: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
