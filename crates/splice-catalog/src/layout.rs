//! On-disk layout of a catalog checkout.
//!
//! ```text
//! <root>/kits/<kit>/plasmids.tsv
//! <root>/kits/<kit>/info.json
//! <root>/addgene_plasmids/<addgene_id>.gb
//! <root>/syntaxes/index.json
//! <root>/syntaxes/index.min.json
//! <root>/syntaxes/<path>/syntax.json
//! <root>/syntaxes/<path>/sub_syntax.json
//! <root>/syntaxes/<path>/plasmids.json
//! ```

use std::io;
use std::path::{Path, PathBuf};

pub const KITS_DIR: &str = "kits";
pub const SYNTAXES_DIR: &str = "syntaxes";
pub const PLASMIDS_DIR: &str = "addgene_plasmids";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Layout {
    pub root: PathBuf,
    pub kits_dir: PathBuf,
    pub syntaxes_dir: PathBuf,
    pub plasmids_dir: PathBuf,
}

impl Default for Layout {
    fn default() -> Self {
        Self::new(".")
    }
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            kits_dir: root.join(KITS_DIR),
            syntaxes_dir: root.join(SYNTAXES_DIR),
            plasmids_dir: root.join(PLASMIDS_DIR),
            root,
        }
    }

    pub fn index_file(&self) -> PathBuf {
        self.syntaxes_dir.join("index.json")
    }

    pub fn minified_index_file(&self) -> PathBuf {
        self.syntaxes_dir.join("index.min.json")
    }

    pub fn syntax_dir(&self, path: &str) -> PathBuf {
        self.syntaxes_dir.join(path)
    }

    pub fn syntax_file(&self, path: &str) -> PathBuf {
        self.syntax_dir(path).join("syntax.json")
    }

    pub fn sub_syntax_file(&self, path: &str) -> PathBuf {
        self.syntax_dir(path).join("sub_syntax.json")
    }

    pub fn catalog_file(&self, path: &str) -> PathBuf {
        self.syntax_dir(path).join("plasmids.json")
    }

    pub fn kit_dir(&self, kit: &str) -> PathBuf {
        self.kits_dir.join(kit)
    }

    pub fn inventory_file(&self, kit: &str) -> PathBuf {
        self.kit_dir(kit).join("plasmids.tsv")
    }

    pub fn kit_info_file(&self, kit: &str) -> PathBuf {
        self.kit_dir(kit).join("info.json")
    }

    pub fn sequence_file(&self, addgene_id: &str) -> PathBuf {
        self.plasmids_dir.join(format!("{addgene_id}.gb"))
    }

    /// Names of the kit directories, sorted.
    pub fn kit_names(&self) -> io::Result<Vec<String>> {
        subdirectories(&self.kits_dir)
    }

    /// Names of the syntax directories, sorted.
    pub fn syntax_paths(&self) -> io::Result<Vec<String>> {
        subdirectories(&self.syntaxes_dir)
    }
}

fn subdirectories(dir: &Path) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_paths() {
        let layout = Layout::new("/data");
        assert_eq!(
            layout.inventory_file("moclo_ytk"),
            PathBuf::from("/data/kits/moclo_ytk/plasmids.tsv")
        );
        assert_eq!(
            layout.sequence_file("65109"),
            PathBuf::from("/data/addgene_plasmids/65109.gb")
        );
        assert_eq!(
            layout.catalog_file("pichia"),
            PathBuf::from("/data/syntaxes/pichia/plasmids.json")
        );
        assert_eq!(
            layout.minified_index_file(),
            PathBuf::from("/data/syntaxes/index.min.json")
        );
    }

    #[test]
    fn test_kit_names_sorted_dirs_only() {
        let tmp = tempfile::tempdir().unwrap();
        let layout = Layout::new(tmp.path());
        for kit in ["zeta", "alpha"] {
            std::fs::create_dir_all(layout.kit_dir(kit)).unwrap();
        }
        std::fs::write(layout.kits_dir.join("README"), "notes").unwrap();
        assert_eq!(layout.kit_names().unwrap(), vec!["alpha", "zeta"]);
    }
}
