//! Syntax and Part definitions, and the validation pass that guards them.
//!
//! Documents are decoded in two steps. Serde first reads the raw
//! [`SyntaxDocument`] / [`PartDocument`] shapes, where a missing required
//! field or a wrong JSON type is a decoding error. [`SyntaxDocument::validate`]
//! then checks every rule and returns either a [`Syntax`] or the full list of
//! [`Violation`]s found.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::Regex;
use serde::{Deserialize, Serialize};
use splice_core::operations::is_unambiguous_dna;
use thiserror::Error;

static ORCID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{4}-\d{4}-\d{4}$").expect("ORCID pattern compiles"));
static HEX_COLOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#[0-9a-fA-F]{6}$").expect("color pattern compiles"));

pub const OVERHANG_LEN: usize = 4;

/// A 4-base sticky end, stored uppercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Overhang(String);

impl Overhang {
    pub fn parse(value: &str) -> Option<Self> {
        if value.len() == OVERHANG_LEN && is_unambiguous_dna(value) {
            Some(Overhang(value.to_ascii_uppercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Overhang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Overhang {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Overhang::parse(&value).ok_or_else(|| format!("'{value}' is not a 4-base overhang"))
    }
}

impl From<Overhang> for String {
    fn from(value: Overhang) -> Self {
        value.0
    }
}

/// A single rule broken by a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Violation {
    #[error("submitter '{0}' is not an ORCID iD (0000-0000-0000-0000)")]
    InvalidOrcid(String),
    #[error("overhangNames key '{0}' is not a 4-base overhang")]
    InvalidOverhangName(String),
    #[error("overhangNames key '{0}' names overhang {1} a second time")]
    DuplicateOverhangName(String, Overhang),
    #[error("part {part}: id must be a positive integer")]
    NonPositiveId { part: i64 },
    #[error("part id {0} is used by more than one part")]
    DuplicatePartId(i64),
    #[error("part {part}: {field} '{value}' is not a 4-base overhang")]
    InvalidOverhang {
        part: i64,
        field: &'static str,
        value: String,
    },
    #[error("part {part}: {field} '{value}' may only contain A, C, G and T")]
    InvalidInside {
        part: i64,
        field: &'static str,
        value: String,
    },
    #[error("part {part}: {field} must not be negative (got {value})")]
    NegativeCodonStart {
        part: i64,
        field: &'static str,
        value: i64,
    },
    #[error("part {part}: color '{value}' is not a #RRGGBB hex code")]
    InvalidColor { part: i64, value: String },
}

/// Every violation found in a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.violations))]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

fn describe(violations: &[Violation]) -> String {
    let lines: Vec<String> = violations.iter().map(|v| format!("  - {v}")).collect();
    format!("{} validation error(s):\n{}", violations.len(), lines.join("\n"))
}

impl ValidationError {
    fn check(violations: Vec<Violation>) -> Result<(), ValidationError> {
        if violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError { violations })
        }
    }
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed syntax document: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A part as written in `syntax.json`, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartDocument {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub info: String,
    #[serde(default)]
    pub glyph: String,
    pub left_overhang: String,
    pub right_overhang: String,
    #[serde(default)]
    pub left_inside: String,
    #[serde(default)]
    pub right_inside: String,
    #[serde(default)]
    pub left_codon_start: i64,
    #[serde(default)]
    pub right_codon_start: i64,
    #[serde(default)]
    pub color: String,
}

/// A syntax as written in `syntax.json`, before validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyntaxDocument {
    pub syntax_name: String,
    pub assembly_enzyme: String,
    pub domestication_enzyme: String,
    pub related_dois: Vec<String>,
    pub submitters: Vec<String>,
    pub overhang_names: IndexMap<String, String>,
    pub parts: Vec<PartDocument>,
}

/// One interchangeable building block of a syntax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "PartDocument")]
pub struct Part {
    pub id: u32,
    pub name: String,
    pub info: String,
    pub glyph: String,
    pub left_overhang: Overhang,
    pub right_overhang: Overhang,
    pub left_inside: String,
    pub right_inside: String,
    pub left_codon_start: u32,
    pub right_codon_start: u32,
    pub color: String,
}

/// A validated assembly grammar: parts in declaration order plus provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SyntaxDocument")]
pub struct Syntax {
    pub syntax_name: String,
    pub assembly_enzyme: String,
    pub domestication_enzyme: String,
    pub related_dois: Vec<String>,
    pub submitters: Vec<String>,
    pub overhang_names: IndexMap<Overhang, String>,
    pub parts: Vec<Part>,
}

impl PartDocument {
    pub fn validate(self) -> Result<Part, ValidationError> {
        let part = self.id;
        let mut violations = Vec::new();

        let id = u32::try_from(self.id).ok().filter(|id| *id > 0);
        if id.is_none() {
            violations.push(Violation::NonPositiveId { part });
        }

        let mut overhang = |field: &'static str, value: &str| {
            let parsed = Overhang::parse(value);
            if parsed.is_none() {
                violations.push(Violation::InvalidOverhang {
                    part,
                    field,
                    value: value.to_string(),
                });
            }
            parsed
        };
        let left_overhang = overhang("left_overhang", &self.left_overhang);
        let right_overhang = overhang("right_overhang", &self.right_overhang);

        for (field, value) in [
            ("left_inside", &self.left_inside),
            ("right_inside", &self.right_inside),
        ] {
            if !is_unambiguous_dna(value) {
                violations.push(Violation::InvalidInside {
                    part,
                    field,
                    value: value.clone(),
                });
            }
        }

        let mut codon_start = |field: &'static str, value: i64| match u32::try_from(value) {
            Ok(v) => v,
            Err(_) => {
                violations.push(Violation::NegativeCodonStart { part, field, value });
                0
            }
        };
        let left_codon_start = codon_start("left_codon_start", self.left_codon_start);
        let right_codon_start = codon_start("right_codon_start", self.right_codon_start);

        if !self.color.is_empty() && !HEX_COLOR.is_match(&self.color) {
            violations.push(Violation::InvalidColor {
                part,
                value: self.color.clone(),
            });
        }

        match (id, left_overhang, right_overhang) {
            (Some(id), Some(left_overhang), Some(right_overhang)) if violations.is_empty() => Ok(Part {
                id,
                name: self.name,
                info: self.info,
                glyph: self.glyph,
                left_overhang,
                right_overhang,
                left_inside: self.left_inside.to_ascii_uppercase(),
                right_inside: self.right_inside.to_ascii_uppercase(),
                left_codon_start,
                right_codon_start,
                color: self.color,
            }),
            _ => Err(ValidationError { violations }),
        }
    }
}

impl SyntaxDocument {
    pub fn validate(self) -> Result<Syntax, ValidationError> {
        let mut violations: Vec<Violation> = self
            .submitters
            .iter()
            .filter(|s| !ORCID.is_match(s))
            .map(|s| Violation::InvalidOrcid(s.clone()))
            .collect();

        let mut overhang_names = IndexMap::with_capacity(self.overhang_names.len());
        for (key, name) in self.overhang_names {
            match Overhang::parse(&key) {
                Some(overhang) if overhang_names.contains_key(&overhang) => {
                    violations.push(Violation::DuplicateOverhangName(key, overhang));
                }
                Some(overhang) => {
                    overhang_names.insert(overhang, name);
                }
                None => violations.push(Violation::InvalidOverhangName(key)),
            }
        }

        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        let mut parts = Vec::with_capacity(self.parts.len());
        for doc in self.parts {
            if !seen.insert(doc.id) && reported.insert(doc.id) {
                violations.push(Violation::DuplicatePartId(doc.id));
            }
            match doc.validate() {
                Ok(part) => parts.push(part),
                Err(err) => violations.extend(err.violations),
            }
        }

        ValidationError::check(violations)?;
        Ok(Syntax {
            syntax_name: self.syntax_name,
            assembly_enzyme: self.assembly_enzyme,
            domestication_enzyme: self.domestication_enzyme,
            related_dois: self.related_dois,
            submitters: self.submitters,
            overhang_names,
            parts,
        })
    }
}

impl TryFrom<PartDocument> for Part {
    type Error = ValidationError;

    fn try_from(doc: PartDocument) -> Result<Self, Self::Error> {
        doc.validate()
    }
}

impl TryFrom<SyntaxDocument> for Syntax {
    type Error = ValidationError;

    fn try_from(doc: SyntaxDocument) -> Result<Self, Self::Error> {
        doc.validate()
    }
}

impl From<&Part> for PartDocument {
    fn from(part: &Part) -> Self {
        PartDocument {
            id: i64::from(part.id),
            name: part.name.clone(),
            info: part.info.clone(),
            glyph: part.glyph.clone(),
            left_overhang: part.left_overhang.to_string(),
            right_overhang: part.right_overhang.to_string(),
            left_inside: part.left_inside.clone(),
            right_inside: part.right_inside.clone(),
            left_codon_start: i64::from(part.left_codon_start),
            right_codon_start: i64::from(part.right_codon_start),
            color: part.color.clone(),
        }
    }
}

impl From<&Syntax> for SyntaxDocument {
    fn from(syntax: &Syntax) -> Self {
        SyntaxDocument {
            syntax_name: syntax.syntax_name.clone(),
            assembly_enzyme: syntax.assembly_enzyme.clone(),
            domestication_enzyme: syntax.domestication_enzyme.clone(),
            related_dois: syntax.related_dois.clone(),
            submitters: syntax.submitters.clone(),
            overhang_names: syntax
                .overhang_names
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
            parts: syntax.parts.iter().map(PartDocument::from).collect(),
        }
    }
}

impl Part {
    /// Boundary identifier, `LEFT-RIGHT`.
    pub fn key(&self) -> String {
        format!("{}-{}", self.left_overhang, self.right_overhang)
    }
}

impl Syntax {
    /// Decode and validate a `syntax.json` document.
    pub fn from_json(text: &str) -> Result<Syntax, SchemaError> {
        let doc: SyntaxDocument = serde_json::from_str(text)?;
        Ok(doc.validate()?)
    }

    pub fn part(&self, id: u32) -> Option<&Part> {
        self.parts.iter().find(|p| p.id == id)
    }

    pub fn overhang_name(&self, overhang: &Overhang) -> Option<&str> {
        self.overhang_names.get(overhang).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::{json, Value};

    fn valid_syntax() -> Value {
        json!({
            "syntaxName": "Test Syntax",
            "assemblyEnzyme": "BsaI",
            "domesticationEnzyme": "BsmBI",
            "relatedDois": ["10.1000/xyz123"],
            "submitters": ["0000-0000-0000-0000"],
            "overhangNames": {"ACGT": "test_overhang"},
            "parts": [
                {"id": 1, "name": "part1", "left_overhang": "ACGT", "right_overhang": "CGTA"}
            ]
        })
    }

    fn valid_part() -> Value {
        json!({
            "id": 1,
            "name": "1",
            "info": "Assembly connector",
            "glyph": "three-prime-sticky-restriction-site",
            "left_overhang": "CCCT",
            "right_overhang": "AACG",
            "left_inside": "A",
            "right_inside": "ATTTTTTTT",
            "left_codon_start": 0,
            "right_codon_start": 0,
            "color": "#84c5de"
        })
    }

    fn with(mut base: Value, key: &str, value: Value) -> Value {
        base[key] = value;
        base
    }

    fn syntax(doc: Value) -> Result<Syntax, SchemaError> {
        Syntax::from_json(&doc.to_string())
    }

    fn part(doc: Value) -> Result<Part, ValidationError> {
        serde_json::from_value::<PartDocument>(doc).unwrap().validate()
    }

    #[test]
    fn test_valid_syntax() {
        let s = syntax(valid_syntax()).unwrap();
        assert_eq!(s.syntax_name, "Test Syntax");
        assert_eq!(s.parts.len(), 1);
        assert_eq!(s.parts[0].key(), "ACGT-CGTA");
        assert_eq!(
            s.overhang_name(&Overhang::parse("acgt").unwrap()),
            Some("test_overhang")
        );
    }

    #[rstest]
    #[case(json!(["0000-0000-0000"]))]
    #[case(json!(["invalid"]))]
    #[case(json!(["0000-0000-0000-000X"]))]
    #[case(json!(["0000-0002-1825-0097", " 0000-0000-0000-0000"]))]
    fn test_invalid_submitters(#[case] submitters: Value) {
        let err = syntax(with(valid_syntax(), "submitters", submitters)).unwrap_err();
        assert!(matches!(err, SchemaError::Invalid(_)));
    }

    #[rstest]
    #[case("ACG")]
    #[case("ACGTG")]
    #[case("NNNN")]
    #[case("")]
    fn test_invalid_overhang_names(#[case] key: &str) {
        let mut names = serde_json::Map::new();
        names.insert(key.to_string(), json!("test"));
        let err = syntax(with(valid_syntax(), "overhangNames", Value::Object(names))).unwrap_err();
        match err {
            SchemaError::Invalid(e) => assert_eq!(
                e.violations,
                vec![Violation::InvalidOverhangName(key.to_string())]
            ),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_overhang_names_differing_in_case() {
        let names = json!({"ACGT": "a", "acgt": "b", "TTGC": "c"});
        let err = syntax(with(valid_syntax(), "overhangNames", names)).unwrap_err();
        match err {
            SchemaError::Invalid(e) => assert_eq!(
                e.violations,
                vec![Violation::DuplicateOverhangName(
                    "acgt".to_string(),
                    Overhang::parse("ACGT").unwrap()
                )]
            ),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_duplicate_part_ids() {
        let parts = json!([
            {"id": 1, "name": "part1", "left_overhang": "ACGT", "right_overhang": "CGTA"},
            {"id": 1, "name": "part2", "left_overhang": "TTTT", "right_overhang": "AAAA"},
            {"id": 1, "name": "part3", "left_overhang": "GGGG", "right_overhang": "CCCC"}
        ]);
        let err = syntax(with(valid_syntax(), "parts", parts)).unwrap_err();
        match err {
            SchemaError::Invalid(e) => {
                assert_eq!(e.violations, vec![Violation::DuplicatePartId(1)])
            }
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_unique_part_ids_keep_order() {
        let parts = json!([
            {"id": 7, "name": "b", "left_overhang": "ttgc", "right_overhang": "AAAA"},
            {"id": 2, "name": "a", "left_overhang": "ACGT", "right_overhang": "CGTA"}
        ]);
        let s = syntax(with(valid_syntax(), "parts", parts)).unwrap();
        let ids: Vec<u32> = s.parts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![7, 2]);
        assert_eq!(s.parts[0].left_overhang.as_str(), "TTGC");
    }

    #[test]
    fn test_missing_required_field() {
        let mut doc = valid_syntax();
        doc.as_object_mut().unwrap().remove("assemblyEnzyme");
        assert!(matches!(syntax(doc).unwrap_err(), SchemaError::Json(_)));
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let doc = with(valid_syntax(), "curatorNotes", json!("anything"));
        assert!(syntax(doc).is_ok());
    }

    #[test]
    fn test_all_violations_reported() {
        let parts = json!([
            {"id": 0, "name": "p", "left_overhang": "NNNN", "right_overhang": "CGTA", "color": "red"}
        ]);
        let doc = with(
            with(valid_syntax(), "parts", parts),
            "submitters",
            json!(["nope"]),
        );
        match syntax(doc).unwrap_err() {
            SchemaError::Invalid(e) => assert_eq!(e.violations.len(), 4),
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_part_validation() {
        part(valid_part()).unwrap();

        for side in ["left", "right"] {
            let overhang = format!("{side}_overhang");
            let inside = format!("{side}_inside");
            let codon = format!("{side}_codon_start");

            assert!(part(with(valid_part(), &overhang, json!("CCCTT"))).is_err());
            assert!(part(with(valid_part(), &overhang, json!("NNNN"))).is_err());
            assert!(part(with(valid_part(), &overhang, json!(""))).is_err());
            assert!(part(with(valid_part(), &inside, json!("NNNN"))).is_err());

            part(with(valid_part(), &inside, json!("ATTTTTTTT"))).unwrap();
            part(with(valid_part(), &inside, json!(""))).unwrap();
            part(with(valid_part(), &codon, json!(0))).unwrap();
            part(with(valid_part(), &codon, json!(1000))).unwrap();

            let err = part(with(valid_part(), &codon, json!(-1))).unwrap_err();
            assert!(matches!(
                err.violations[0],
                Violation::NegativeCodonStart { value: -1, .. }
            ));
        }

        assert!(part(with(valid_part(), "color", json!("invalid"))).is_err());
        assert!(part(with(valid_part(), "color", json!("#84c5d"))).is_err());
        part(with(valid_part(), "color", json!("#ABCDEF"))).unwrap();
    }

    #[rstest]
    #[case("ACGT", true)]
    #[case("acgt", true)]
    #[case("TTTT", true)]
    #[case("ACG", false)]
    #[case("ACGTA", false)]
    #[case("ACGN", false)]
    #[case("ACGU", false)]
    #[case("", false)]
    fn test_overhang_parse(#[case] value: &str, #[case] valid: bool) {
        assert_eq!(Overhang::parse(value).is_some(), valid);
    }

    #[test]
    fn test_default_values() {
        let p = part(json!({
            "id": 1, "name": "1", "left_overhang": "CCCT", "right_overhang": "AACG"
        }))
        .unwrap();
        assert_eq!(p.info, "");
        assert_eq!(p.glyph, "");
        assert_eq!(p.left_inside, "");
        assert_eq!(p.right_inside, "");
        assert_eq!(p.left_codon_start, 0);
        assert_eq!(p.right_codon_start, 0);
        assert_eq!(p.color, "");
    }

    #[test]
    fn test_serialized_syntax_reloads() {
        let s = syntax(valid_syntax()).unwrap();
        let text = serde_json::to_string(&s).unwrap();
        assert!(text.contains("\"syntaxName\""));
        assert!(text.contains("\"left_overhang\""));
        let reloaded: Syntax = serde_json::from_str(&text).unwrap();
        assert_eq!(reloaded, s);
    }

    #[test]
    fn test_deserialize_rejects_invalid() {
        let doc = with(valid_syntax(), "submitters", json!(["bad"]));
        assert!(serde_json::from_value::<Syntax>(doc).is_err());
    }
}
