//! The catalog entry index (`syntaxes/index.json`) and its minified form.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A kit contributing plasmids to an entry, optionally restricted by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KitSelection {
    pub kit: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
}

impl KitSelection {
    pub fn includes(&self, plasmid_name: &str) -> bool {
        self.names
            .as_ref()
            .is_none_or(|names| names.iter().any(|n| n == plasmid_name))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    pub path: String,
    pub description: String,
    pub kits: Vec<KitSelection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uses_syntax: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends_syntax: Option<String>,
}

/// How an entry obtains its syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxOrigin {
    /// `syntaxes/<path>/syntax.json`
    Own,
    /// Reuses the syntax stored under the named path.
    Alias(String),
    /// Adds `sub_syntax.json` to the syntax stored under the named path.
    Extension(String),
}

impl CatalogEntry {
    pub fn origin(&self) -> Result<SyntaxOrigin, CatalogError> {
        match (&self.uses_syntax, &self.extends_syntax) {
            (None, None) => Ok(SyntaxOrigin::Own),
            (Some(parent), None) => Ok(SyntaxOrigin::Alias(parent.clone())),
            (None, Some(parent)) => Ok(SyntaxOrigin::Extension(parent.clone())),
            (Some(_), Some(_)) => Err(CatalogError::Entry {
                name: self.name.clone(),
                reason: "uses_syntax and extends_syntax are mutually exclusive".to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSummary {
    pub path: String,
    pub description: String,
}

/// `index.min.json`: entry name to location and description.
pub type MinifiedIndex = IndexMap<String, IndexSummary>;

/// Decode `index.json`.
pub fn parse_index(text: &str) -> Result<Vec<CatalogEntry>, serde_json::Error> {
    serde_json::from_str(text)
}

pub fn check_unique_names(entries: &[CatalogEntry]) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    match entries.iter().find(|e| !seen.insert(e.name.as_str())) {
        Some(dup) => Err(CatalogError::Entry {
            name: dup.name.clone(),
            reason: "name appears more than once in the index".to_string(),
        }),
        None => Ok(()),
    }
}

pub fn minify(entries: &[CatalogEntry]) -> MinifiedIndex {
    entries
        .iter()
        .map(|e| {
            (
                e.name.clone(),
                IndexSummary {
                    path: e.path.clone(),
                    description: e.description.clone(),
                },
            )
        })
        .collect()
}
