use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use lctrace::locator::BlockKind;

mod batch;
mod config;
mod prompt;

/// lctrace - combine LabSolutions detector traces into one CSV
#[derive(Parser, Debug)]
#[command(name = "lctrace")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory with the exported .txt reports (prompted for when omitted)
    #[arg(value_name = "DIR")]
    dir: Option<PathBuf>,

    /// Flow rate in ml/min used to convert retention time to volume
    #[arg(short = 'f', long)]
    flow_rate: Option<f64>,

    /// Detector trace to extract
    #[arg(short = 't', long, value_enum)]
    trace: Option<TraceArg>,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Skip reports that cannot be parsed instead of aborting
    #[arg(long)]
    skip_invalid: bool,

    /// Let a block without its own '# of Points' line reuse the previous count
    #[arg(long)]
    legacy_point_count: bool,

    /// Output file name inside DIR (default: processed.csv)
    #[arg(short = 'o', long, value_name = "NAME")]
    output: Option<String>,

    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

/// Detector trace selection on the command line
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum TraceArg {
    /// UV absorbance (Detector A)
    Uv,
    /// Fluorescence (Detector B)
    Fl,
}

impl From<TraceArg> for BlockKind {
    fn from(arg: TraceArg) -> Self {
        match arg {
            TraceArg::Uv => BlockKind::Uv,
            TraceArg::Fl => BlockKind::Fluorescence,
        }
    }
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    batch::run(batch::BatchArgs {
        dir: cli.dir,
        flow_rate: cli.flow_rate,
        trace: cli.trace.map(BlockKind::from),
        config: cli.config,
        skip_invalid: cli.skip_invalid,
        legacy_point_count: cli.legacy_point_count,
        output: cli.output,
    })
}
