use serde::{Deserialize, Serialize};

use crate::feature::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    Linear,
    Circular,
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topology::Linear => write!(f, "linear"),
            Topology::Circular => write!(f, "circular"),
        }
    }
}

/// Header fields carried over from a sequence record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SequenceMetadata {
    #[serde(default)]
    pub accession: Option<String>,
    #[serde(default)]
    pub organism: Option<String>,
    #[serde(default)]
    pub molecule_type: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
}

/// An annotated DNA record, e.g. a plasmid downloaded from a repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sequence {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub topology: Topology,
    pub sequence: String,
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub metadata: SequenceMetadata,
}

impl Sequence {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>, topology: Topology) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            topology,
            sequence: sequence.into().to_uppercase(),
            features: Vec::new(),
            metadata: SequenceMetadata::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    pub fn is_circular(&self) -> bool {
        self.topology == Topology::Circular
    }

    /// Read `length` bases starting at `start`.
    ///
    /// Circular records wrap around the origin (and may be read past a full
    /// turn); linear records are truncated at their end.
    pub fn slice_wrapping(&self, start: usize, length: usize) -> String {
        let bases = self.sequence.as_bytes();
        let n = bases.len();
        if n == 0 {
            return String::new();
        }
        if !self.is_circular() {
            let start = start.min(n);
            let end = (start + length).min(n);
            return self.sequence[start..end].to_string();
        }
        (0..length).map(|k| bases[(start + k) % n] as char).collect()
    }

    pub fn add_feature(&mut self, feature: Feature) {
        self.features.push(feature);
    }
}
