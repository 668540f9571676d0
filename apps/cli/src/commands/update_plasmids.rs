use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use splice_addgene::{update_plasmids, AddgeneClient, ClientConfig, DownloadConfig};
use splice_catalog::Layout;
use tracing::{info, warn};

use crate::cli::UpdatePlasmidsArgs;

pub fn run(args: UpdatePlasmidsArgs, layout: &Layout) -> Result<()> {
    let kit_dirs: Vec<PathBuf> = layout
        .kit_names()
        .with_context(|| format!("listing kits in {}", layout.kits_dir.display()))?
        .iter()
        .map(|kit| layout.kit_dir(kit))
        .collect();

    let client = AddgeneClient::new(&ClientConfig {
        timeout: args.http.timeout(),
        ..ClientConfig::default()
    })?;
    let config = DownloadConfig {
        batch_size: args.batch_size,
        cooldown: Duration::from_secs(args.cooldown_secs),
    };

    let report = update_plasmids(&kit_dirs, &layout.plasmids_dir, &client, &config)?;
    info!(
        kits = kit_dirs.len(),
        fetched = report.fetched.len(),
        cached = report.already_cached,
        failed = report.failed.len(),
        "sequence cache updated"
    );
    for (addgene_id, error) in &report.failed {
        warn!(%addgene_id, "not downloaded: {error}");
    }
    Ok(())
}
