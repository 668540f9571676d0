use std::process::ExitCode;

use splice_catalog::Layout;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

fn init_tracing(options: &cli::GlobalOptions) {
    let filter = if options.verbose {
        EnvFilter::new("debug")
    } else if options.quiet {
        EnvFilter::new("warn")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = cli::parse();
    init_tracing(&cli.global);

    let layout = Layout::new(&cli.global.root);
    match commands::dispatch(cli.command, &layout) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
