//! Kit inventory pages.
//!
//! An Addgene kit page lists its plasmids in the last
//! `table.kit-inventory-table` inside `#kit-contents`; earlier tables with the
//! same class may hold only headers. Each row is `Well | Plasmid | Resistance`
//! and the plasmid cell links to the plasmid's page, whose last path segment
//! is the Addgene id.

use std::path::Path;
use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use splice_formats::inventory::{write_inventory_file, InventoryRow};
use tracing::debug;

use crate::links::last_path_segment;
use crate::AddgeneError;

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector parses")
}

static KIT_TITLE: LazyLock<Selector> = LazyLock::new(|| selector("h1#kit-title"));
static KIT_CONTENTS: LazyLock<Selector> = LazyLock::new(|| selector("#kit-contents"));
static INVENTORY_TABLE: LazyLock<Selector> =
    LazyLock::new(|| selector("table.kit-inventory-table"));
static HEADERS: LazyLock<Selector> = LazyLock::new(|| selector("thead th"));
static TBODY: LazyLock<Selector> = LazyLock::new(|| selector("tbody"));
static ROW: LazyLock<Selector> = LazyLock::new(|| selector("tr"));
static CELL: LazyLock<Selector> = LazyLock::new(|| selector("td"));
static LINK: LazyLock<Selector> = LazyLock::new(|| selector("a"));

const EXPECTED_HEADERS: [&str; 3] = ["Well", "Plasmid", "Resistance"];

/// `info.json` next to a kit's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitInfo {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KitPage {
    pub title: String,
    pub rows: Vec<InventoryRow>,
}

fn text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

fn structure(message: &str) -> AddgeneError {
    AddgeneError::Structure(message.to_string())
}

/// Pull the kit title and plasmid rows out of a kit page.
pub fn extract_inventory(html: &str) -> Result<KitPage, AddgeneError> {
    let document = Html::parse_document(html);

    let title = document
        .select(&KIT_TITLE)
        .next()
        .map(text)
        .ok_or_else(|| structure("#kit-title not found"))?;

    let contents = document
        .select(&KIT_CONTENTS)
        .next()
        .ok_or_else(|| structure("#kit-contents not found"))?;

    let table = contents
        .select(&INVENTORY_TABLE)
        .last()
        .ok_or_else(|| structure("kit-inventory-table not found"))?;

    let headers: Vec<String> = table.select(&HEADERS).map(text).collect();
    if headers.len() != EXPECTED_HEADERS.len() {
        return Err(AddgeneError::Structure(format!(
            "expected 3 headers, found {}",
            headers.len()
        )));
    }
    if headers.iter().zip(EXPECTED_HEADERS).any(|(h, e)| h != e) {
        return Err(AddgeneError::Structure(format!(
            "unexpected table headers: {}",
            headers.join(", ")
        )));
    }

    let tbody = table
        .select(&TBODY)
        .next()
        .ok_or_else(|| structure("the table does not have a tbody"))?;

    let mut rows = Vec::new();
    for tr in tbody.select(&ROW) {
        let cells: Vec<ElementRef<'_>> = tr.select(&CELL).collect();
        if cells.len() < 3 {
            continue;
        }
        let Some(addgene_id) = cells[1]
            .select(&LINK)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(last_path_segment)
        else {
            debug!(row = %text(tr), "skipping row without a plasmid link");
            continue;
        };
        rows.push(InventoryRow::new(
            text(cells[0]),
            text(cells[1]),
            addgene_id,
            text(cells[2]),
        ));
    }

    Ok(KitPage { title, rows })
}

/// Write `plasmids.tsv` and `info.json` into `dir`.
pub fn write_kit(dir: &Path, page: &KitPage, url: &str) -> Result<(), AddgeneError> {
    std::fs::create_dir_all(dir).map_err(|e| AddgeneError::io(dir, e))?;
    write_inventory_file(dir.join("plasmids.tsv"), &page.rows)?;

    let info = KitInfo {
        title: page.title.clone(),
        url: url.to_string(),
    };
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    info.serialize(&mut ser)?;

    let path = dir.join("info.json");
    std::fs::write(&path, buf).map_err(|e| AddgeneError::io(&path, e))
}
