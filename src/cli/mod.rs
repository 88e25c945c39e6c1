//! CLI definition, logging setup and the build handler

pub mod config;
pub mod handlers;

use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// chanzero - build a static site by following links from one markdown page
#[derive(Parser, Debug)]
#[command(name = "chanzero", version, about, long_about = None)]
pub struct Cli {
    /// Path to the root source document of the site
    #[arg(long, value_name = "PATH")]
    pub src: PathBuf,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Installs the stderr log subscriber.
///
/// `-v` enables INFO and `-vv` DEBUG; otherwise `RUST_LOG` applies,
/// defaulting to WARN.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    // A subscriber may already be installed when embedded; keep it
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
