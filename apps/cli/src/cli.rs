use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "splice",
    about = "Build the syntax plasmid catalog from Addgene kits",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOptions,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args)]
pub struct GlobalOptions {
    /// Catalog checkout containing kits/, syntaxes/ and addgene_plasmids/
    #[arg(long, global = true, value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log warnings and errors (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Command {
    /// Scrape an Addgene kit page into kits/<kit>/
    AddKit(AddKitArgs),

    /// Download sequences for kit plasmids missing from addgene_plasmids/
    UpdatePlasmids(UpdatePlasmidsArgs),

    /// Assign kit plasmids to syntax parts and write every catalog
    #[command(visible_alias = "categorize")]
    Categorise,

    /// Check every syntax definition
    Validate,
}

#[derive(Args)]
pub struct HttpOptions {
    /// Per-request timeout
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,
}

impl HttpOptions {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Args)]
pub struct AddKitArgs {
    /// Kit page, e.g. https://www.addgene.org/kits/moclo-ytk/
    pub url: String,

    #[command(flatten)]
    pub http: HttpOptions,
}

#[derive(Args)]
pub struct UpdatePlasmidsArgs {
    /// Pause after every batch of requests
    #[arg(long, value_name = "SECS", default_value_t = 2)]
    pub cooldown_secs: u64,

    /// Requests per batch
    #[arg(long, value_name = "N", default_value_t = 10)]
    pub batch_size: usize,

    #[command(flatten)]
    pub http: HttpOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}
