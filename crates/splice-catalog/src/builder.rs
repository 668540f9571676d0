//! Building the plasmid catalog from kit inventories.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use splice_core::sequence::Sequence;
use splice_formats::inventory::{read_inventory_file, InventoryRow};
use splice_formats::{parse_sequence_file, ParseError};
use tracing::{debug, info, warn};

use crate::compose;
use crate::error::CatalogError;
use crate::index::{self, CatalogEntry, KitSelection, MinifiedIndex, SyntaxOrigin};
use crate::layout::Layout;
use crate::matcher::{Assignment, PartMatch, PartMatcher};
use crate::plasmid::CatalogPlasmid;
use crate::schema::{Syntax, SyntaxDocument};

/// Provides annotated sequence records by repository id.
pub trait SequenceSource {
    fn load(&self, addgene_id: &str) -> Result<Sequence, ParseError>;
}

/// GenBank files cached as `<dir>/<addgene_id>.gb`.
#[derive(Debug, Clone)]
pub struct SequenceCache {
    dir: PathBuf,
}

impl SequenceCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path(&self, addgene_id: &str) -> PathBuf {
        self.dir.join(format!("{addgene_id}.gb"))
    }
}

impl SequenceSource for SequenceCache {
    fn load(&self, addgene_id: &str) -> Result<Sequence, ParseError> {
        parse_sequence_file(self.path(addgene_id))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    Unassigned,
    Ambiguous(Vec<String>),
    MissingSequence(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::Unassigned => f.write_str("it could not be assigned to a syntax part"),
            SkipReason::Ambiguous(keys) => write!(
                f,
                "it could be assigned to multiple syntax parts ({})",
                keys.join(", ")
            ),
            SkipReason::MissingSequence(err) => write!(f, "its sequence is unavailable: {err}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Skip {
    pub kit: String,
    pub plasmid: String,
    pub addgene_id: String,
    pub reason: SkipReason,
}

/// Rows of one kit, paired with the entry's selection for it.
#[derive(Debug, Clone)]
pub struct KitInventory {
    pub selection: KitSelection,
    pub rows: Vec<InventoryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryReport {
    pub name: String,
    pub plasmids: Vec<CatalogPlasmid>,
    pub skipped: Vec<Skip>,
}

/// Everything a catalog run produced.
#[derive(Debug, Clone)]
pub struct CatalogRun {
    pub reports: Vec<EntryReport>,
    pub index: MinifiedIndex,
}

/// Assign every selected kit plasmid to a part of `syntax`.
///
/// Catalog ids are handed out from 1 in the order plasmids are assigned.
/// Plasmids that match no part, several parts, or have no sequence are
/// reported as skipped.
pub fn build_entry(
    name: &str,
    syntax: &Syntax,
    kits: &[KitInventory],
    sequences: &dyn SequenceSource,
) -> Result<EntryReport, CatalogError> {
    let matcher = PartMatcher::new(syntax).map_err(|source| CatalogError::Match {
        name: name.to_string(),
        source,
    })?;

    let mut plasmids = Vec::new();
    let mut skipped = Vec::new();
    for kit in kits {
        let selected: Vec<&InventoryRow> = kit
            .rows
            .iter()
            .filter(|row| kit.selection.includes(&row.name))
            .collect();
        info!(entry = name, kit = %kit.selection.kit, plasmids = selected.len(), "categorising kit");

        for row in selected {
            let outcome = sequences
                .load(&row.addgene_id)
                .map_err(|err| SkipReason::MissingSequence(err.to_string()))
                .map(|record| matcher.assign(&record));

            let reason = match outcome {
                Ok(Assignment::Assigned(m)) => {
                    debug!(
                        plasmid = %row.name,
                        key = %m.key(),
                        feature = m.feature_name().unwrap_or(""),
                        "assigned plasmid"
                    );
                    let id = plasmids.len() as u32 + 1;
                    plasmids.push(CatalogPlasmid::new(id, row, m.part));
                    continue;
                }
                Ok(Assignment::Unassigned) => SkipReason::Unassigned,
                Ok(Assignment::Ambiguous(matches)) => {
                    SkipReason::Ambiguous(matches.iter().map(PartMatch::key).collect())
                }
                Err(reason) => reason,
            };

            warn!(
                plasmid = %row.name,
                addgene_id = %row.addgene_id,
                "skipped plasmid {} ({}) because {reason}",
                row.name,
                row.addgene_id
            );
            skipped.push(Skip {
                kit: kit.selection.kit.clone(),
                plasmid: row.name.clone(),
                addgene_id: row.addgene_id.clone(),
                reason,
            });
        }
    }

    Ok(EntryReport {
        name: name.to_string(),
        plasmids,
        skipped,
    })
}

pub fn read_index(layout: &Layout) -> Result<Vec<CatalogEntry>, CatalogError> {
    let path = layout.index_file();
    let text = std::fs::read_to_string(&path).map_err(|e| CatalogError::io(&path, e))?;
    let entries = index::parse_index(&text).map_err(|e| CatalogError::json(&path, e))?;
    index::check_unique_names(&entries)?;
    Ok(entries)
}

/// Read and validate a complete `syntax.json`.
pub fn load_syntax(path: &Path) -> Result<Syntax, CatalogError> {
    let doc: SyntaxDocument = read_json(path)?;
    doc.validate().map_err(|source| CatalogError::Invalid {
        path: path.to_path_buf(),
        source,
    })
}

/// The effective syntax of `entry`.
///
/// Extension entries are merged here but not written back; see
/// [`build_catalog`].
pub fn resolve_syntax(layout: &Layout, entry: &CatalogEntry) -> Result<Syntax, CatalogError> {
    match entry.origin()? {
        SyntaxOrigin::Own => load_syntax(&layout.syntax_file(&entry.path)),
        SyntaxOrigin::Alias(parent) => {
            if layout.syntax_file(&entry.path).exists() {
                return Err(CatalogError::Entry {
                    name: entry.name.clone(),
                    reason: format!(
                        "uses syntax '{parent}' but also ships its own {}",
                        layout.syntax_file(&entry.path).display()
                    ),
                });
            }
            let parent = load_syntax(&layout.syntax_file(&parent))?;
            Ok(compose::alias(&parent))
        }
        SyntaxOrigin::Extension(parent) => {
            let parent = load_syntax(&layout.syntax_file(&parent))?;
            let sub_path = layout.sub_syntax_file(&entry.path);
            let sub: SyntaxDocument = read_json(&sub_path)?;
            compose::extend(sub, &parent).map_err(|source| CatalogError::Invalid {
                path: sub_path,
                source,
            })
        }
    }
}

pub fn load_kits(layout: &Layout, entry: &CatalogEntry) -> Result<Vec<KitInventory>, CatalogError> {
    entry
        .kits
        .iter()
        .map(|selection| {
            let path = layout.inventory_file(&selection.kit);
            let rows = read_inventory_file(&path)
                .map_err(|source| CatalogError::Inventory { path, source })?;
            Ok(KitInventory {
                selection: selection.clone(),
                rows,
            })
        })
        .collect()
}

/// Rebuild every entry's `plasmids.json` and the minified index.
pub fn build_catalog(layout: &Layout, sequences: &dyn SequenceSource) -> Result<CatalogRun, CatalogError> {
    let entries = read_index(layout)?;

    let mut reports = Vec::with_capacity(entries.len());
    for entry in &entries {
        let syntax = resolve_syntax(layout, entry)?;
        let dir = layout.syntax_dir(&entry.path);
        std::fs::create_dir_all(&dir).map_err(|e| CatalogError::io(&dir, e))?;

        if let SyntaxOrigin::Extension(parent) = entry.origin()? {
            info!(entry = %entry.name, parent = %parent, parts = syntax.parts.len(), "writing merged syntax");
            write_json_pretty(&layout.syntax_file(&entry.path), &syntax)?;
        }

        let kits = load_kits(layout, entry)?;
        let report = build_entry(&entry.name, &syntax, &kits, sequences)?;
        write_json_pretty(&layout.catalog_file(&entry.path), &report.plasmids)?;
        info!(
            entry = %entry.name,
            plasmids = report.plasmids.len(),
            skipped = report.skipped.len(),
            "wrote catalog"
        );
        reports.push(report);
    }

    let index = index::minify(&entries);
    let path = layout.minified_index_file();
    let text = serde_json::to_string(&index).map_err(|e| CatalogError::json(&path, e))?;
    std::fs::write(&path, text).map_err(|e| CatalogError::io(&path, e))?;

    Ok(CatalogRun { reports, index })
}

/// Result of checking one syntax definition.
#[derive(Debug)]
pub struct SyntaxCheck {
    pub label: String,
    pub result: Result<usize, CatalogError>,
}

/// Validate every stored `syntax.json` and every index entry's effective
/// syntax. Nothing is written.
pub fn check_syntaxes(layout: &Layout) -> Result<Vec<SyntaxCheck>, CatalogError> {
    let mut checks = Vec::new();

    let paths = layout
        .syntax_paths()
        .map_err(|e| CatalogError::io(&layout.syntaxes_dir, e))?;
    for path in paths {
        let file = layout.syntax_file(&path);
        if file.exists() {
            checks.push(SyntaxCheck {
                label: file.display().to_string(),
                result: load_syntax(&file).map(|s| s.parts.len()),
            });
        }
    }

    if layout.index_file().exists() {
        for entry in read_index(layout)? {
            checks.push(SyntaxCheck {
                label: format!("index entry '{}'", entry.name),
                result: resolve_syntax(layout, &entry).map(|s| s.parts.len()),
            });
        }
    }
    Ok(checks)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CatalogError> {
    let text = std::fs::read_to_string(path).map_err(|e| CatalogError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| CatalogError::json(path, e))
}

/// Pretty-print with four-space indentation.
fn write_json_pretty<T: Serialize>(path: &Path, value: &T) -> Result<(), CatalogError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| CatalogError::json(path, e))?;
    std::fs::write(path, buf).map_err(|e| CatalogError::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::PartDocument;
    use pretty_assertions::assert_eq;
    use splice_core::sequence::Topology;
    use std::collections::HashMap;

    /// In-memory records keyed by repository id.
    struct Records(HashMap<String, Sequence>);

    impl SequenceSource for Records {
        fn load(&self, addgene_id: &str) -> Result<Sequence, ParseError> {
            self.0
                .get(addgene_id)
                .cloned()
                .ok_or_else(|| ParseError::InvalidFormat(format!("no record for {addgene_id}")))
        }
    }

    const BACKBONE: &str = "TTTTTTTTTTAAAAAAAAAACCCCCCCCCC";

    fn plasmid(left: &str, body: &str, right: &str) -> Sequence {
        Sequence::new(
            "test",
            format!("GGTCTCA{left}{body}{right}TGAGACC{BACKBONE}"),
            Topology::Circular,
        )
    }

    fn part(id: i64, left: &str, right: &str, left_inside: &str) -> PartDocument {
        PartDocument {
            id,
            name: format!("part{id}"),
            info: String::new(),
            glyph: String::new(),
            left_overhang: left.to_string(),
            right_overhang: right.to_string(),
            left_inside: left_inside.to_string(),
            right_inside: String::new(),
            left_codon_start: 0,
            right_codon_start: 0,
            color: String::new(),
        }
    }

    fn syntax() -> Syntax {
        SyntaxDocument {
            syntax_name: "Test".to_string(),
            assembly_enzyme: "BsaI".to_string(),
            domestication_enzyme: "BsmBI".to_string(),
            related_dois: vec![],
            submitters: vec![],
            overhang_names: Default::default(),
            parts: vec![
                part(1, "AATT", "CCGG", ""),
                part(2, "ACGT", "TGCA", ""),
                part(3, "ACGT", "TGCA", "AA"),
            ],
        }
        .validate()
        .unwrap()
    }

    fn sequences() -> Records {
        Records(HashMap::from([
            ("12345".to_string(), plasmid("AATT", "GGGGGG", "CCGG")),
            ("222".to_string(), plasmid("CATG", "GGGGGG", "GTAC")),
            ("333".to_string(), plasmid("ACGT", "AAGGGG", "TGCA")),
            ("444".to_string(), plasmid("ACGT", "GGGGGG", "TGCA")),
        ]))
    }

    fn kit(rows: Vec<InventoryRow>) -> KitInventory {
        KitInventory {
            selection: KitSelection {
                kit: "test_kit".to_string(),
                names: None,
            },
            rows,
        }
    }

    #[test]
    fn test_unique_match_emits_entry() {
        let kits = [kit(vec![InventoryRow::new("A1", "GFP-reporter", "12345", "AmpR")])];
        let report = build_entry("Test", &syntax(), &kits, &sequences()).unwrap();
        assert!(report.skipped.is_empty());
        assert_eq!(report.plasmids.len(), 1);
        let p = &report.plasmids[0];
        assert_eq!(p.id, 1);
        assert_eq!(p.plasmid_name, "GFP-reporter");
        assert_eq!((p.left_overhang.as_str(), p.right_overhang.as_str()), ("AATT", "CCGG"));
    }

    #[test]
    fn test_content_note_in_name() {
        let row = InventoryRow::new("A1", "GFP-reporter", "12345", "AmpR").with_content("clone2");
        let report = build_entry("Test", &syntax(), &[kit(vec![row])], &sequences()).unwrap();
        assert_eq!(report.plasmids[0].plasmid_name, "GFP-reporter (clone2)");
    }

    #[test]
    fn test_skips_do_not_stop_the_batch() {
        let kits = [kit(vec![
            InventoryRow::new("A1", "no-part", "222", "AmpR"),
            InventoryRow::new("A2", "two-parts", "333", "AmpR"),
            InventoryRow::new("A3", "no-file", "999", "AmpR"),
            InventoryRow::new("A4", "GFP-reporter", "12345", "AmpR"),
            InventoryRow::new("A5", "connector", "444", "AmpR"),
        ])];
        let report = build_entry("Test", &syntax(), &kits, &sequences()).unwrap();

        let ids: Vec<(u32, &str)> = report
            .plasmids
            .iter()
            .map(|p| (p.id, p.plasmid_name.as_str()))
            .collect();
        assert_eq!(ids, vec![(1, "GFP-reporter"), (2, "connector")]);

        let reasons: Vec<(&str, &SkipReason)> = report
            .skipped
            .iter()
            .map(|s| (s.addgene_id.as_str(), &s.reason))
            .collect();
        assert_eq!(reasons.len(), 3);
        assert_eq!(reasons[0], ("222", &SkipReason::Unassigned));
        assert_eq!(
            reasons[1],
            (
                "333",
                &SkipReason::Ambiguous(vec!["ACGT-TGCA".to_string(), "ACGT-TGCA".to_string()])
            )
        );
        assert!(matches!(reasons[2], ("999", SkipReason::MissingSequence(_))));
    }

    #[test]
    fn test_name_filter() {
        let mut selected = kit(vec![
            InventoryRow::new("A1", "GFP-reporter", "12345", "AmpR"),
            InventoryRow::new("A2", "connector", "444", "AmpR"),
        ]);
        selected.selection.names = Some(vec!["connector".to_string()]);
        let report = build_entry("Test", &syntax(), &[selected], &sequences()).unwrap();
        assert_eq!(report.plasmids.len(), 1);
        assert_eq!(report.plasmids[0].plasmid_name, "connector");
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_unknown_enzyme_is_fatal() {
        let mut s = syntax();
        s.assembly_enzyme = "Unobtainium".to_string();
        let err = build_entry("Test", &s, &[], &sequences()).unwrap_err();
        assert!(matches!(err, CatalogError::Match { .. }));
    }

    #[test]
    fn test_skip_reason_messages() {
        assert_eq!(
            SkipReason::Unassigned.to_string(),
            "it could not be assigned to a syntax part"
        );
        assert!(SkipReason::Ambiguous(vec!["A-B".to_string()])
            .to_string()
            .starts_with("it could be assigned to multiple syntax parts"));
    }
}
