//! Command handlers for the CLI.

mod build;

use std::path::Path;

use crate::export::{PageOutcome, PageReport, ProgressReporter};

pub use build::handle_build;

/// Progress reporter that prints to stdout.
///
/// Every dispatched page gets a progress line; failures go to stderr.
pub(crate) struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub(crate) fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_page_start(&mut self, source: &Path, destination: &Path) {
        println!("  {} -> {}", source.display(), destination.display());
    }

    fn on_page(&mut self, report: &PageReport) {
        match &report.outcome {
            PageOutcome::Exported => {
                if self.verbose {
                    println!("  written: {}", report.destination.display());
                }
            }
            PageOutcome::ReadFailed(msg) => {
                eprintln!("  error: {}: {}", report.source.display(), msg)
            }
            PageOutcome::WriteFailed(msg) => {
                eprintln!("  error: {}: {}", report.destination.display(), msg)
            }
        }
    }

    fn on_complete(&mut self, exported: usize, failed: usize) {
        if failed > 0 {
            eprintln!("Exported {} pages with {} errors", exported, failed);
        } else {
            println!("Exported {} pages", exported);
        }
    }
}
