//! Logging for Kinoplay binaries.
//!
//! The console shows Kinoplay's own events at the level the user picked and
//! keeps HTTP internals at `warn`. Every run also writes a complete trace to
//! disk, which is where absorbed discovery faults end up.

use std::fs::{File, create_dir_all};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, fmt};

use crate::KinoplayError;

/// Name of the per-run log file inside the logs directory.
pub const LOG_FILE_NAME: &str = "kinoplay-last-run.log";

/// Crates whose events the console shows at the chosen level.
const KINOPLAY_TARGETS: &[&str] = &["kinoplay", "kinoplay_core", "kinoplay_sources"];

/// Installs the global subscriber and returns the path of the trace file.
///
/// `RUST_LOG`, when set, replaces the console filter. The trace file lives in
/// `logs_dir` (default `./logs`) and is truncated on every run.
///
/// # Errors
/// - `KinoplayError::Io` - Logs directory or trace file could not be created
/// - `KinoplayError::Configuration` - A global subscriber is already installed
pub fn init_tracing(console_level: Level, logs_dir: Option<&Path>) -> Result<PathBuf, KinoplayError> {
    let (trace_file, trace_path) = open_trace_file(logs_dir.unwrap_or_else(|| Path::new("logs")))?;

    let console = fmt::layer()
        .with_target(true)
        .with_writer(std::io::stderr)
        .with_filter(console_filter(console_level));

    let full_trace = fmt::layer()
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(trace_file)
        .with_filter(EnvFilter::new("trace"));

    tracing_subscriber::registry()
        .with(console)
        .with(full_trace)
        .try_init()
        .map_err(|e| KinoplayError::Configuration {
            reason: format!("logging already initialized: {e}"),
        })?;

    tracing::debug!(console = %console_level, trace = %trace_path.display(), "Logging ready");
    Ok(trace_path)
}

fn open_trace_file(dir: &Path) -> Result<(File, PathBuf), KinoplayError> {
    create_dir_all(dir)?;
    let path = dir.join(LOG_FILE_NAME);
    let file = File::create(&path)?;
    Ok((file, path))
}

fn console_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_directives(level)))
}

/// `warn` for everything else, `level` for Kinoplay crates.
fn console_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    KINOPLAY_TARGETS
        .iter()
        .fold(String::from("warn"), |mut directives, target| {
            directives.push_str(&format!(",{target}={level}"));
            directives
        })
}

/// Console verbosity accepted by `--log-level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl CliLogLevel {
    /// ```
    /// use kinoplay_core::tracing_setup::CliLogLevel;
    ///
    /// assert_eq!(CliLogLevel::Debug.as_tracing_level(), tracing::Level::DEBUG);
    /// ```
    pub fn as_tracing_level(self) -> Level {
        match self {
            CliLogLevel::Error => Level::ERROR,
            CliLogLevel::Warn => Level::WARN,
            CliLogLevel::Info => Level::INFO,
            CliLogLevel::Debug => Level::DEBUG,
            CliLogLevel::Trace => Level::TRACE,
        }
    }
}

impl std::fmt::Display for CliLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.to_possible_value() {
            Some(value) => f.write_str(value.get_name()),
            None => Ok(()),
        }
    }
}
