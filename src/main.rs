//! # chronorm CLI
//!
//! Command-line front-end for normalizing chromatography detector traces.
//!
//! ## Usage
//!
//! ```bash
//! # Normalize two runs over one retention-time window
//! chronorm process run_01.xlsx run_02.xlsx --range 0:28 --mode both
//!
//! # Inspect an export
//! chronorm info run_01.xlsx
//!
//! # Generate a synthetic export to play with
//! chronorm demo
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
