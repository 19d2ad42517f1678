//! CLI entry point for the collage generator

use clap::Parser;
use log::info;
use patchwork::io::cli::{Cli, CollageProcessor};

fn main() -> patchwork::Result<()> {
    let cli = Cli::parse();
    let default_filter = if cli.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let mut processor = CollageProcessor::new(cli);
    let report = processor.process()?;
    info!(
        "Stopped ({:?}) after {} collages, {} placements, {} delivery failures",
        report.stop_reason, report.completed_attempts, report.total_steps, report.delivery_failures
    );
    Ok(())
}
