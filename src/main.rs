//! # lctrace
//!
//! Command-line tool that combines the UV or fluorescence traces of a
//! directory of LabSolutions ASCII reports into one `processed.csv`.
//!
//! ## Usage
//!
//! ```bash
//! # Interactive: prompts for directory, flow rate and trace
//! lctrace
//!
//! # Non-interactive
//! lctrace runs/2024-05-13 --flow-rate 0.5 --trace uv
//!
//! # Keep going past unreadable reports
//! lctrace runs/2024-05-13 --skip-invalid -v
//! ```

mod cli;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli::init_logging(cli.verbosity());
    cli::dispatch(cli)
}
