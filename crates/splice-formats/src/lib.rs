pub mod genbank;
pub mod inventory;

use std::path::Path;

use splice_core::Sequence;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("Invalid inventory: {0}")]
    Inventory(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Read and parse a GenBank file from disk.
pub fn parse_sequence_file(path: impl AsRef<Path>) -> Result<Sequence, ParseError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    if !content.trim_start().starts_with("LOCUS") {
        return Err(ParseError::InvalidFormat(format!(
            "{} is not a GenBank file",
            path.display()
        )));
    }
    genbank::parse(&content)
}
