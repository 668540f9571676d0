use anyhow::Result;
use splice_catalog::{build_catalog, Layout, SequenceCache};
use tracing::info;

pub fn run(layout: &Layout) -> Result<()> {
    let sequences = SequenceCache::new(&layout.plasmids_dir);
    let run = build_catalog(layout, &sequences)?;

    let assigned: usize = run.reports.iter().map(|r| r.plasmids.len()).sum();
    let skipped: usize = run.reports.iter().map(|r| r.skipped.len()).sum();
    info!(
        entries = run.index.len(),
        assigned,
        skipped,
        "wrote {}",
        layout.minified_index_file().display()
    );
    Ok(())
}
