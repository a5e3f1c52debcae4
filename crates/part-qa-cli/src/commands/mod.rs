//! CLI command definitions and handlers.

pub mod history;
pub mod inspect;

use clap::{Parser, Subcommand};

/// Part QA - Pass/fail inspection of manufactured parts from a single image
#[derive(Parser)]
#[command(name = "part-qa")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Shared inspect arguments (paths, thresholds, flags).
    #[command(flatten)]
    pub inspect: inspect::InspectArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Inspect part images and report a verdict for each
    Inspect(inspect::InspectArgs),
    /// Query the inspection history
    History(history::HistoryArgs),
}

/// Process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every inspected part passed.
    Success = 0,
    /// At least one part failed inspection.
    Failed = 1,
    /// Bad arguments, or images that could not be loaded or inspected.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}
