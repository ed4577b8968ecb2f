use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

/// Upstream sites the pipeline talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceId {
    Moex,
    Cbr,
    SmartLab,
}

impl SourceId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Moex => "moex",
            Self::Cbr => "cbr",
            Self::SmartLab => "smartlab",
        }
    }
}

impl Display for SourceId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure classes for upstream calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    /// Network failure or timeout.
    Transport,
    /// Upstream answered with a non-2xx status.
    Status,
    /// Body could not be decoded into the expected structure.
    Decode,
    /// An expected block, table or field is absent.
    NotFound,
    /// Price data has neither a last nor a previous price.
    Incomplete,
}

/// Structured upstream error. Every variant is fatal for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    source_id: SourceId,
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    fn new(source_id: SourceId, kind: SourceErrorKind, message: impl Into<String>) -> Self {
        Self {
            source_id,
            kind,
            message: message.into(),
        }
    }

    pub fn transport(source_id: SourceId, message: impl Into<String>) -> Self {
        Self::new(source_id, SourceErrorKind::Transport, message)
    }

    pub fn status(source_id: SourceId, status: u16, url: &str) -> Self {
        Self::new(
            source_id,
            SourceErrorKind::Status,
            format!("{source_id} returned status {status} for {url}"),
        )
    }

    pub fn decode(source_id: SourceId, message: impl Into<String>) -> Self {
        Self::new(source_id, SourceErrorKind::Decode, message)
    }

    pub fn not_found(source_id: SourceId, message: impl Into<String>) -> Self {
        Self::new(source_id, SourceErrorKind::NotFound, message)
    }

    pub fn incomplete(source_id: SourceId, message: impl Into<String>) -> Self {
        Self::new(source_id, SourceErrorKind::Incomplete, message)
    }

    pub const fn source_id(&self) -> SourceId {
        self.source_id
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Transport => "source.transport",
            SourceErrorKind::Status => "source.status",
            SourceErrorKind::Decode => "source.decode",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Incomplete => "source.incomplete",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}
