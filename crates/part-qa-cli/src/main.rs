//! Part QA CLI - Pass/fail inspection of manufactured parts.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

mod commands;
mod config;
mod output;

use commands::history::HistoryArgs;
use commands::inspect::InspectArgs;
use commands::{Cli, Commands, ExitCode};
use config::AppConfig;

fn main() -> std::process::ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load();

    let exit_code = match cli.command {
        Some(Commands::Inspect(args)) => inspect(InspectArgs::with_config(args, &config)),
        Some(Commands::History(args)) => {
            match commands::history::run(&HistoryArgs::with_config(args, &config)) {
                Ok(()) => ExitCode::Success,
                Err(e) => {
                    eprintln!("error: {e:#}");
                    ExitCode::Error
                }
            }
        }
        None => {
            // Default behavior: run inspect with flattened args
            if cli.inspect.paths.is_empty() {
                eprintln!("error: No paths specified. Use --help for usage information.");
                return ExitCode::Error.into();
            }
            inspect(InspectArgs::with_config(cli.inspect, &config))
        }
    };

    exit_code.into()
}

fn inspect(args: InspectArgs) -> ExitCode {
    match commands::inspect::run(&args) {
        Ok(outcome) => outcome.exit_code(),
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::Error
        }
    }
}
