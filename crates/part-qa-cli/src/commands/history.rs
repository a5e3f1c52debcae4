//! History command - query recorded inspection verdicts.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Subcommand};
use part_qa_adapters::{default_history_path, JsonlRecordStore};
use part_qa_core::RecordStore;
use serde::Serialize;
use tracing::debug;

use crate::config::AppConfig;

/// Arguments for the history command.
#[derive(Args, Clone)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,

    /// History file (overrides config and default location)
    #[arg(long, value_name = "FILE", global = true)]
    pub history_file: Option<PathBuf>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,
}

/// History subcommands.
#[derive(Subcommand, Clone)]
pub enum HistoryCommand {
    /// List recorded verdicts, newest first
    List {
        /// Maximum number of records to show
        #[arg(long, default_value_t = 100)]
        limit: usize,
    },
    /// Show pass/fail totals and the average quality score
    Stats,
}

impl HistoryArgs {
    /// Apply configuration file values, respecting CLI precedence.
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if args.history_file.is_none() {
            args.history_file.clone_from(&config.history.file);
        }
        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        args
    }
}

/// Run the history command.
pub fn run(args: &HistoryArgs) -> Result<()> {
    let path = args
        .history_file
        .clone()
        .unwrap_or_else(default_history_path);
    debug!("Reading history from {}", path.display());
    let store = JsonlRecordStore::new(path);

    let mut stdout = io::stdout().lock();
    match args.command {
        HistoryCommand::List { limit } => {
            let records = store.records(limit)?;
            print_json(&mut stdout, &records, args.pretty)
        }
        HistoryCommand::Stats => {
            let stats = store.statistics()?;
            print_json(&mut stdout, &stats, args.pretty)
        }
    }
}

fn print_json<T: Serialize + ?Sized>(out: &mut impl Write, value: &T, pretty: bool) -> Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    writeln!(out, "{json}")?;
    out.flush()?;
    Ok(())
}
