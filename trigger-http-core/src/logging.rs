use clap::ValueEnum;
use std::io::{self, IsTerminal};
use tracing_subscriber::{EnvFilter, fmt};

/// Initialize the logging system with environment-based filtering.
///
/// - Uses `RUST_LOG` for log level filtering (defaults to "info" if not set)
/// - Writes to stderr so stdout only carries command output
/// - `Json` flattens event fields for machine consumption
pub fn init_logging(mode: LogMode) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match mode {
        LogMode::Json => fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .json()
            .flatten_event(true)
            .init(),
        LogMode::Pretty => fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .compact()
            .init(),
    }
}

pub fn default_log_mode() -> LogMode {
    if io::stderr().is_terminal() {
        LogMode::Pretty
    } else {
        LogMode::Json
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogMode {
    Json,
    Pretty,
}
