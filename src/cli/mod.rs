use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use chronorm::range::TimeRange;
use chronorm::results::Mode;

mod config;
mod demo;
mod info;
mod process;

pub use config::Config;

/// chronorm - Chromatography Trace Normalization
#[derive(Parser)]
#[command(name = "chronorm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Normalization mode selector.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ModeArg {
    /// Per-file height normalization only
    Height,
    /// Cross-file kinetic normalization only
    Kinetic,
    /// Both normalizations
    Both,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Height => Mode::Height,
            ModeArg::Kinetic => Mode::Kinetic,
            ModeArg::Both => Mode::Both,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize detector traces from one or more exports into a workbook
    Process {
        /// Input .xlsx or .csv detector exports
        #[arg(value_name = "INPUT", num_args = 1..)]
        inputs: Vec<PathBuf>,

        /// Time range to extract, as START:STOP (repeatable)
        #[arg(short, long = "range", value_name = "START:STOP")]
        ranges: Vec<TimeRange>,

        /// Normalization mode (height, kinetic, both)
        #[arg(short, long, value_enum)]
        mode: Option<ModeArg>,

        /// Output workbook path
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Display information about a detector export
    Info {
        /// Input .xlsx or .csv detector export
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate a synthetic detector export for trying the tool
    Demo {
        /// Output workbook path
        #[arg(value_name = "OUTPUT", default_value = "demo_traces.xlsx")]
        output: PathBuf,
    },
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
    match cli.command {
        Commands::Process {
            inputs,
            ranges,
            mode,
            output,
            config,
        } => process::run(inputs, ranges, mode, output, config),
        Commands::Info { file, json } => info::run(file, json),
        Commands::Demo { output } => demo::run(output),
    }
}
