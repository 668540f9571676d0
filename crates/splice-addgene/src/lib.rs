//! Addgene kit scraping and sequence downloads.

pub mod client;
pub mod download;
pub mod kit;
pub mod links;

use std::path::PathBuf;

use splice_formats::ParseError;
use thiserror::Error;

pub use client::{AddgeneClient, ClientConfig, SequenceFetcher};
pub use download::{update_plasmids, DownloadConfig, DownloadReport};
pub use kit::{extract_inventory, KitInfo, KitPage};
pub use links::{kit_dirname, last_path_segment, normalize_url};

pub const ADDGENE_ORIGIN: &str = "https://www.addgene.org/";

#[derive(Debug, Error)]
pub enum AddgeneError {
    #[error("URL must start with https://www.addgene.org/: {0}")]
    ForeignUrl(String),

    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("the HTML document does not have the expected structure: {0}")]
    Structure(String),

    #[error("no GenBank file is listed for plasmid {0}")]
    NoSequence(String),

    #[error("expected a plasmids.tsv in {}", .0.display())]
    MissingInventory(PathBuf),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl AddgeneError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        AddgeneError::Io {
            path: path.into(),
            source,
        }
    }
}
