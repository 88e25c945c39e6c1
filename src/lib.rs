//! chanzero - turn a tree of linked markdown pages into a static HTML site

pub mod cli;
pub mod export;
pub mod infra;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, config::Config, handlers::handle_build, init_logging};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    handle_build(&cli, &config)
}
