//! Tab-separated kit inventories (`plasmids.tsv`).
//!
//! Columns: `well`, `name`, `addgene_id`, `resistance`, and an optional
//! trailing `content` note that older files omit.

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ParseError;

const BASE_COLUMNS: [&str; 4] = ["well", "name", "addgene_id", "resistance"];

/// One physical plasmid listed in a kit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRow {
    pub well: String,
    pub name: String,
    pub addgene_id: String,
    pub resistance: String,
    #[serde(default)]
    pub content: String,
}

impl InventoryRow {
    pub fn new(
        well: impl Into<String>,
        name: impl Into<String>,
        addgene_id: impl Into<String>,
        resistance: impl Into<String>,
    ) -> Self {
        Self {
            well: well.into(),
            name: name.into(),
            addgene_id: addgene_id.into(),
            resistance: resistance.into(),
            content: String::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }
}

/// Read inventory rows from tab-separated text with a header line.
pub fn read_inventory<R: Read>(reader: R) -> Result<Vec<InventoryRow>, ParseError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<&str> = BASE_COLUMNS
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();
    if !missing.is_empty() {
        return Err(ParseError::InvalidFormat(format!(
            "inventory header is missing column(s): {}",
            missing.join(", ")
        )));
    }

    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

pub fn read_inventory_file(path: impl AsRef<Path>) -> Result<Vec<InventoryRow>, ParseError> {
    let file = std::fs::File::open(path)?;
    read_inventory(file)
}

/// Write rows as tab-separated text.
///
/// The `content` column is only emitted when at least one row carries a note.
pub fn write_inventory<W: Write>(writer: W, rows: &[InventoryRow]) -> Result<(), ParseError> {
    let with_content = rows.iter().any(|r| !r.content.is_empty());
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    let mut header = BASE_COLUMNS.to_vec();
    if with_content {
        header.push("content");
    }
    wtr.write_record(&header)?;

    for row in rows {
        let mut record = vec![
            row.well.as_str(),
            row.name.as_str(),
            row.addgene_id.as_str(),
            row.resistance.as_str(),
        ];
        if with_content {
            record.push(row.content.as_str());
        }
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_inventory_file(path: impl AsRef<Path>, rows: &[InventoryRow]) -> Result<(), ParseError> {
    let file = std::fs::File::create(path)?;
    write_inventory(file, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_read_with_content_column() {
        let tsv = "well\tname\taddgene_id\tresistance\tcontent\n\
                   A1\tGFP-reporter\t12345\tAmpR\tclone2\n\
                   A2\tpYTK002\t65109\tCamR\t\n";
        let rows = read_inventory(tsv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0],
            InventoryRow::new("A1", "GFP-reporter", "12345", "AmpR").with_content("clone2")
        );
        assert_eq!(rows[1].content, "");
    }

    #[test]
    fn test_read_without_content_column() {
        let tsv = "well\tname\taddgene_id\tresistance\nB1\tpart \"x\"\t777\tKanR\n";
        let rows = read_inventory(tsv.as_bytes()).unwrap();
        assert_eq!(rows[0].name, "part \"x\"");
        assert_eq!(rows[0].content, "");
    }

    #[test]
    fn test_missing_column_is_rejected() {
        let tsv = "well\tname\tresistance\nA1\tx\tAmpR\n";
        let err = read_inventory(tsv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("addgene_id"));
    }

    #[test]
    fn test_write_then_read() {
        let rows = vec![
            InventoryRow::new("A1", "pA", "1", "AmpR"),
            InventoryRow::new("A2", "pB", "2", "KanR"),
        ];
        let mut buf = Vec::new();
        write_inventory(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("well\tname\taddgene_id\tresistance\n"));
        assert_eq!(read_inventory(text.as_bytes()).unwrap(), rows);
    }
}
