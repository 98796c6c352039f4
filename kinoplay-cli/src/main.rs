//! Kinoplay CLI - Command-line interface
//!
//! Browse the film catalog and resolve embeddable players for a film.

mod commands;
mod output;
mod terminal;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use kinoplay_core::KinoplayError;
use kinoplay_core::tracing_setup::{CliLogLevel, init_tracing};

#[derive(Parser)]
#[command(name = "kinoplay")]
#[command(about = "Find embeddable players for films from the Kinopoisk catalog")]
struct Cli {
    /// Console log level (the log file always records everything)
    #[arg(long, value_enum, default_value_t = CliLogLevel::Warn, global = true)]
    log_level: CliLogLevel,

    /// Directory for the per-run log file
    #[arg(long, global = true)]
    logs_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_level.as_tracing_level(), cli.logs_dir.as_deref()) {
        eprintln!("Logging disabled: {e}");
    }

    match commands::handle_command(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            match e.downcast_ref::<KinoplayError>() {
                Some(kinoplay) if kinoplay.is_user_error() => {
                    eprintln!("{}", kinoplay.user_message());
                    ExitCode::from(2)
                }
                _ => {
                    eprintln!("Error: {e:#}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
