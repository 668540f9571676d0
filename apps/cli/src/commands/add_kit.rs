use anyhow::{Context, Result};
use splice_addgene::kit::write_kit;
use splice_addgene::{extract_inventory, kit_dirname, normalize_url, AddgeneClient, ClientConfig};
use splice_catalog::Layout;
use tracing::info;

use crate::cli::AddKitArgs;

pub fn run(args: AddKitArgs, layout: &Layout) -> Result<()> {
    let url = normalize_url(&args.url)?;
    let name = kit_dirname(&url)?;

    let client = AddgeneClient::new(&ClientConfig {
        timeout: args.http.timeout(),
        ..ClientConfig::default()
    })?;
    let html = client
        .fetch_kit_page(&url)
        .with_context(|| format!("fetching kit page {url}"))?;
    let kit = extract_inventory(&html).with_context(|| format!("reading kit page {url}"))?;

    let dir = layout.kit_dir(&name);
    write_kit(&dir, &kit, &url)?;
    info!(
        kit = %name,
        title = %kit.title,
        plasmids = kit.rows.len(),
        "wrote {}",
        dir.display()
    );
    Ok(())
}
