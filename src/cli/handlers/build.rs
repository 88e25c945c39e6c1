//! Build command handler.

use anyhow::{Context, Result, bail};

use super::ConsoleReporter;
use crate::cli::Cli;
use crate::cli::config::Config;
use crate::export::export_site;

pub fn handle_build(cli: &Cli, config: &Config) -> Result<()> {
    let root = &cli.src;
    if !root.is_file() {
        bail!("couldn't open root document {}", root.display());
    }

    let mut reporter = ConsoleReporter::new(cli.verbose > 0);

    println!("Exporting site from {}...", root.display());
    let report = export_site(root, &config.render_defaults(), &mut reporter)
        .with_context(|| format!("failed to export site from {}", root.display()))?;

    tracing::info!(
        exported = report.exported(),
        failed = report.failed(),
        "export finished"
    );

    Ok(())
}
