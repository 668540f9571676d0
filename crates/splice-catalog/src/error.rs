use std::path::PathBuf;

use splice_formats::ParseError;
use thiserror::Error;

use crate::matcher::MatchError;
use crate::schema::ValidationError;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed JSON in {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid syntax {}: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        source: ValidationError,
    },

    #[error("cannot read inventory {}: {source}", .path.display())]
    Inventory {
        path: PathBuf,
        source: ParseError,
    },

    #[error("catalog entry '{name}': {reason}")]
    Entry { name: String, reason: String },

    #[error("catalog entry '{name}': {source}")]
    Match { name: String, source: MatchError },
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn json(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        CatalogError::Json {
            path: path.into(),
            source,
        }
    }
}
