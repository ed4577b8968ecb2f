use std::path::PathBuf;

use moexbrief_core::CoreError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] moexbrief_core::ValidationError),

    #[error(transparent)]
    Source(#[from] moexbrief_core::SourceError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error("{action} '{}': {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CliError {
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }

    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Source(_) => 3,
            Self::Serialization(_) => 4,
            Self::Io { .. } => 10,
        }
    }
}

impl From<CoreError> for CliError {
    fn from(value: CoreError) -> Self {
        match value {
            CoreError::Validation(error) => Self::Validation(error),
            CoreError::Source(error) => Self::Source(error),
            CoreError::Serialization(error) => Self::Serialization(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use moexbrief_core::{SourceError, SourceId, ValidationError};

    use super::*;

    #[test]
    fn core_errors_keep_their_exit_codes() {
        let source = CliError::from(CoreError::Source(SourceError::not_found(
            SourceId::Cbr,
            "key rate not found",
        )));
        let validation = CliError::from(CoreError::Validation(ValidationError::EmptyTicker));

        assert_eq!(source.exit_code(), 3);
        assert_eq!(validation.exit_code(), 2);
    }

    #[test]
    fn io_error_names_the_path() {
        let error = CliError::io(
            "failed to write",
            "out/prompt.txt",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such directory"),
        );

        assert_eq!(error.exit_code(), 10);
        assert!(error.to_string().contains("out/prompt.txt"));
    }
}
