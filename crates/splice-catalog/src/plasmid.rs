use serde::{Deserialize, Serialize};
use splice_formats::inventory::InventoryRow;

use crate::schema::Part;

pub const ADDGENE_SOURCE: &str = "AddgeneIdSource";

/// Where a catalog plasmid can be obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddgeneIdSource {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: String,
    pub input: Vec<u32>,
    pub repository_id: String,
}

impl AddgeneIdSource {
    pub fn new(repository_id: impl Into<String>) -> Self {
        Self {
            id: 1,
            kind: ADDGENE_SOURCE.to_string(),
            input: Vec::new(),
            repository_id: repository_id.into(),
        }
    }
}

/// A kit plasmid bound to the syntax part it implements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPlasmid {
    pub id: u32,
    pub plasmid_name: String,
    pub left_overhang: String,
    pub right_overhang: String,
    pub key: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub source: AddgeneIdSource,
}

impl CatalogPlasmid {
    pub fn new(id: u32, row: &InventoryRow, part: &Part) -> Self {
        Self {
            id,
            plasmid_name: display_name(row),
            left_overhang: part.left_overhang.to_string(),
            right_overhang: part.right_overhang.to_string(),
            key: part.key(),
            kind: ADDGENE_SOURCE.to_string(),
            source: AddgeneIdSource::new(row.addgene_id.clone()),
        }
    }
}

/// Kit name, with the content note appended in parentheses when present.
pub fn display_name(row: &InventoryRow) -> String {
    if row.content.is_empty() {
        row.name.clone()
    } else {
        format!("{} ({})", row.name, row.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PartDocument;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn gfp_part() -> Part {
        serde_json::from_value::<PartDocument>(json!({
            "id": 3, "name": "CDS", "left_overhang": "aatt", "right_overhang": "CCGG"
        }))
        .unwrap()
        .validate()
        .unwrap()
    }

    #[test]
    fn test_plasmid_from_row() {
        let row = InventoryRow::new("A1", "GFP-reporter", "12345", "AmpR");
        let plasmid = CatalogPlasmid::new(1, &row, &gfp_part());
        assert_eq!(plasmid.plasmid_name, "GFP-reporter");
        assert_eq!(plasmid.left_overhang, "AATT");
        assert_eq!(plasmid.right_overhang, "CCGG");
        assert_eq!(plasmid.key, "AATT-CCGG");
        assert_eq!(plasmid.source.repository_id, "12345");
    }

    #[test]
    fn test_content_suffix() {
        let row = InventoryRow::new("A1", "GFP-reporter", "12345", "AmpR").with_content("clone2");
        assert_eq!(display_name(&row), "GFP-reporter (clone2)");
    }

    #[test]
    fn test_json_shape() {
        let row = InventoryRow::new("A1", "GFP-reporter", "12345", "AmpR");
        let value = serde_json::to_value(CatalogPlasmid::new(1, &row, &gfp_part())).unwrap();
        assert_eq!(
            value,
            json!({
                "id": 1,
                "plasmid_name": "GFP-reporter",
                "left_overhang": "AATT",
                "right_overhang": "CCGG",
                "key": "AATT-CCGG",
                "type": "AddgeneIdSource",
                "source": {
                    "id": 1,
                    "type": "AddgeneIdSource",
                    "input": [],
                    "repository_id": "12345"
                }
            })
        );
    }

    #[test]
    fn test_json_reload_is_identical() {
        let row = InventoryRow::new("B4", "pYTK002", "65109", "CamR").with_content("v2");
        let plasmid = CatalogPlasmid::new(7, &row, &gfp_part());
        let text = serde_json::to_string_pretty(&plasmid).unwrap();
        let reloaded: CatalogPlasmid = serde_json::from_str(&text).unwrap();
        assert_eq!(reloaded, plasmid);
        assert_eq!(serde_json::to_string_pretty(&reloaded).unwrap(), text);
    }
}
