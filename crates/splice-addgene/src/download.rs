//! Filling the local sequence cache from kit inventories.

use std::path::{Path, PathBuf};
use std::time::Duration;

use splice_formats::genbank;
use splice_formats::inventory::read_inventory_file;
use tracing::{info, warn};

use crate::client::SequenceFetcher;
use crate::AddgeneError;

#[derive(Debug, Clone)]
pub struct DownloadConfig {
    /// Requests made before pausing.
    pub batch_size: usize,
    pub cooldown: Duration,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            cooldown: Duration::from_secs(2),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadReport {
    pub fetched: Vec<String>,
    /// Addgene id and error message.
    pub failed: Vec<(String, String)>,
    pub already_cached: usize,
    pub cooldowns: usize,
}

pub fn cache_path(cache_dir: &Path, addgene_id: &str) -> PathBuf {
    cache_dir.join(format!("{addgene_id}.gb"))
}

/// Download every plasmid listed in `kit_dirs` that is not cached yet.
///
/// Each kit directory must contain a `plasmids.tsv`. Requests are made one at
/// a time, pausing for `config.cooldown` after every `config.batch_size`
/// requests within a kit. A failed download is logged and skipped.
pub fn update_plasmids(
    kit_dirs: &[PathBuf],
    cache_dir: &Path,
    fetcher: &dyn SequenceFetcher,
    config: &DownloadConfig,
) -> Result<DownloadReport, AddgeneError> {
    update_plasmids_with(kit_dirs, cache_dir, fetcher, config, &mut std::thread::sleep)
}

/// [`update_plasmids`] with a caller-supplied pause.
pub fn update_plasmids_with(
    kit_dirs: &[PathBuf],
    cache_dir: &Path,
    fetcher: &dyn SequenceFetcher,
    config: &DownloadConfig,
    pause: &mut dyn FnMut(Duration),
) -> Result<DownloadReport, AddgeneError> {
    std::fs::create_dir_all(cache_dir).map_err(|e| AddgeneError::io(cache_dir, e))?;
    let mut report = DownloadReport::default();

    for kit_dir in kit_dirs {
        let inventory = kit_dir.join("plasmids.tsv");
        if !inventory.is_file() {
            return Err(AddgeneError::MissingInventory(kit_dir.clone()));
        }
        let rows = read_inventory_file(&inventory)?;

        let mut requests_made = 0;
        for row in rows {
            let path = cache_path(cache_dir, &row.addgene_id);
            if path.exists() {
                report.already_cached += 1;
                continue;
            }

            info!(addgene_id = %row.addgene_id, plasmid = %row.name, "requesting sequence");
            let result = fetcher.fetch_sequence_record(&row.addgene_id);
            requests_made += 1;

            match result {
                Ok(record) => {
                    std::fs::write(&path, genbank::serialize(&record))
                        .map_err(|e| AddgeneError::io(&path, e))?;
                    report.fetched.push(row.addgene_id);
                }
                Err(err) => {
                    warn!(addgene_id = %row.addgene_id, error = %err, "download failed");
                    report.failed.push((row.addgene_id, err.to_string()));
                }
            }

            if config.batch_size > 0 && requests_made % config.batch_size == 0 {
                pause(config.cooldown);
                report.cooldowns += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use splice_core::sequence::{Sequence, Topology};
    use splice_formats::inventory::{write_inventory_file, InventoryRow};
    use std::cell::RefCell;

    struct FakeFetcher {
        calls: RefCell<Vec<String>>,
    }

    impl FakeFetcher {
        fn new() -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl SequenceFetcher for FakeFetcher {
        fn fetch_sequence_record(&self, addgene_id: &str) -> Result<Sequence, AddgeneError> {
            self.calls.borrow_mut().push(addgene_id.to_string());
            if addgene_id.starts_with('9') {
                return Err(AddgeneError::NoSequence(addgene_id.to_string()));
            }
            Ok(Sequence::new(addgene_id, "ACGTACGTAC", Topology::Circular))
        }
    }

    fn kit(root: &Path, name: &str, ids: &[&str]) -> PathBuf {
        let dir = root.join("kits").join(name);
        std::fs::create_dir_all(&dir).unwrap();
        let rows: Vec<InventoryRow> = ids
            .iter()
            .enumerate()
            .map(|(i, id)| InventoryRow::new(format!("A{}", i + 1), format!("p{id}"), *id, "AmpR"))
            .collect();
        write_inventory_file(dir.join("plasmids.tsv"), &rows).unwrap();
        dir
    }

    #[test]
    fn test_fetches_missing_and_skips_cached() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("addgene_plasmids");
        std::fs::create_dir_all(&cache).unwrap();
        std::fs::write(cache_path(&cache, "200"), "LOCUS cached").unwrap();
        let kits = vec![kit(tmp.path(), "k1", &["100", "200", "900", "300"])];

        let fetcher = FakeFetcher::new();
        let mut pauses = Vec::new();
        let report = update_plasmids_with(
            &kits,
            &cache,
            &fetcher,
            &DownloadConfig::default(),
            &mut |d: Duration| pauses.push(d),
        )
        .unwrap();

        assert_eq!(*fetcher.calls.borrow(), vec!["100", "900", "300"]);
        assert_eq!(report.fetched, vec!["100", "300"]);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, "900");
        assert_eq!(report.already_cached, 1);
        assert!(pauses.is_empty());

        let written = std::fs::read_to_string(cache_path(&cache, "100")).unwrap();
        assert!(written.starts_with("LOCUS       100"));
        assert!(!cache_path(&cache, "900").exists());
    }

    #[test]
    fn test_cooldown_every_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("cache");
        let ids: Vec<String> = (1..=23).map(|i| format!("{}", 1000 + i)).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let kits = vec![kit(tmp.path(), "big", &id_refs)];

        let config = DownloadConfig {
            batch_size: 10,
            cooldown: Duration::from_millis(5),
        };
        let mut pauses = Vec::new();
        let report =
            update_plasmids_with(&kits, &cache, &FakeFetcher::new(), &config, &mut |d: Duration| pauses.push(d))
                .unwrap();

        assert_eq!(report.fetched.len(), 23);
        assert_eq!(report.cooldowns, 2);
        assert_eq!(pauses, vec![Duration::from_millis(5); 2]);
    }

    #[test]
    fn test_second_run_fetches_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let cache = tmp.path().join("cache");
        let kits = vec![kit(tmp.path(), "k1", &["1", "2"]), kit(tmp.path(), "k2", &["2", "3"])];
        let fetcher = FakeFetcher::new();
        let config = DownloadConfig::default();

        let first = update_plasmids_with(&kits, &cache, &fetcher, &config, &mut |_: Duration| {}).unwrap();
        // "2" is cached by the time k2 is read
        assert_eq!(first.fetched, vec!["1", "2", "3"]);
        assert_eq!(first.already_cached, 1);

        let second = update_plasmids_with(&kits, &cache, &fetcher, &config, &mut |_: Duration| {}).unwrap();
        assert!(second.fetched.is_empty());
        assert_eq!(second.already_cached, 4);
    }

    #[test]
    fn test_missing_inventory_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let empty = tmp.path().join("kits").join("empty");
        std::fs::create_dir_all(&empty).unwrap();
        let err = update_plasmids_with(
            &[empty],
            &tmp.path().join("cache"),
            &FakeFetcher::new(),
            &DownloadConfig::default(),
            &mut |_: Duration| {},
        )
        .unwrap_err();
        assert!(matches!(err, AddgeneError::MissingInventory(_)));
    }
}
