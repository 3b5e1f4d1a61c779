use clap::{Parser, Subcommand};
use std::path::PathBuf;
use trigger_http_core::cli;
use trigger_http_core::logging::{LogMode, default_log_mode, init_logging};

#[derive(Parser, Debug)]
#[command(
    name = "trigger-http",
    version,
    about = "Normalize serverless HTTP trigger events into canonical requests"
)]
struct Cli {
    /// Log format; defaults to pretty on a terminal and JSON otherwise
    #[arg(long, global = true, value_enum)]
    log_format: Option<LogMode>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical request of an event as JSON
    Normalize {
        /// Path to the event JSON (reads stdin when omitted)
        #[arg(long)]
        event: Option<PathBuf>,

        /// Single-line JSON output
        #[arg(long)]
        compact: bool,
    },

    /// Print the detected payload variant of an event
    Detect {
        /// Path to the event JSON (reads stdin when omitted)
        #[arg(long)]
        event: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    init_logging(cli.log_format.unwrap_or_else(default_log_mode));
    tracing::debug!(command = ?cli.command, "starting");

    let result = match cli.command {
        Command::Normalize { event, compact } => cli::normalize(event.as_deref(), compact),
        Command::Detect { event } => cli::detect(event.as_deref()),
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
