use serde::{Deserialize, Serialize};

/// Key of the annotation that spans a whole record.
pub const SOURCE_KEY: &str = "source";

/// Qualifiers that name a feature, most specific first.
const NAME_QUALIFIERS: [&str; 4] = ["label", "gene", "product", "note"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strand {
    Forward,
    Reverse,
}

/// Spans of the top strand covered by a feature, 0-based and end-exclusive,
/// in the order the record lists them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location {
    spans: Vec<(usize, usize)>,
}

impl Location {
    pub fn span(start: usize, end: usize) -> Self {
        Self {
            spans: vec![(start, end)],
        }
    }

    pub fn join(spans: Vec<(usize, usize)>) -> Self {
        Self { spans }
    }

    pub fn spans(&self) -> &[(usize, usize)] {
        &self.spans
    }

    pub fn is_joined(&self) -> bool {
        self.spans.len() > 1
    }

    pub fn start(&self) -> usize {
        self.spans.first().map_or(0, |s| s.0)
    }

    pub fn end(&self) -> usize {
        self.spans.last().map_or(0, |s| s.1)
    }

    /// Bases covered, summed over all spans.
    pub fn len(&self) -> usize {
        self.spans.iter().map(|(s, e)| e.saturating_sub(*s)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn overlaps(&self, start: usize, end: usize) -> bool {
        self.spans.iter().any(|&(s, e)| s < end && start < e)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Qualifier {
    pub key: String,
    pub value: String,
}

/// An annotation on a record, kept under its original GenBank key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feature {
    pub key: String,
    pub location: Location,
    pub strand: Strand,
    #[serde(default)]
    pub qualifiers: Vec<Qualifier>,
}

impl Feature {
    pub fn new(key: impl Into<String>, location: Location, strand: Strand) -> Self {
        Self {
            key: key.into(),
            location,
            strand,
            qualifiers: Vec::new(),
        }
    }

    pub fn with_qualifier(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.qualifiers.push(Qualifier {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    pub fn is_source(&self) -> bool {
        self.key.eq_ignore_ascii_case(SOURCE_KEY)
    }

    pub fn qualifier(&self, key: &str) -> Option<&str> {
        self.qualifiers
            .iter()
            .find(|q| q.key == key)
            .map(|q| q.value.as_str())
    }

    pub fn label(&self) -> Option<&str> {
        self.qualifier("label")
    }

    /// First naming qualifier present, falling back to the key.
    pub fn display_name(&self) -> &str {
        NAME_QUALIFIERS
            .iter()
            .find_map(|k| self.qualifier(k))
            .unwrap_or(&self.key)
    }

    pub fn start(&self) -> usize {
        self.location.start()
    }

    pub fn end(&self) -> usize {
        self.location.end()
    }

    pub fn len(&self) -> usize {
        self.location.len()
    }

    pub fn is_empty(&self) -> bool {
        self.location.is_empty()
    }
}
