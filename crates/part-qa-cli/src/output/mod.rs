//! Output formatting for CLI.

mod json;
mod progress;

use clap::ValueEnum;

pub use json::JsonOutput;
pub use progress::ProgressBar;

/// Output format for inspection reports.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

impl OutputFormat {
    /// Parses a format name as written in the config file.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "json" => Some(Self::Json),
            "jsonl" => Some(Self::Jsonl),
            _ => None,
        }
    }
}
