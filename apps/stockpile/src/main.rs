//! # Stockpile Entry Point
//!
//! Loads configuration, sets up logging, and runs a headless session
//! against the configured store.
//!
//! ## Usage
//! ```bash
//! # Default: SQLite in the platform data directory
//! stockpile
//!
//! # Explicit config file
//! stockpile --config ./stockpile.toml
//!
//! # Throwaway in-memory store
//! STOCKPILE_STORAGE_BACKEND=memory stockpile
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config_path = parse_config_arg(std::env::args().skip(1));

    let config = match stockpile_app::load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("stockpile: {}", e);
            return ExitCode::FAILURE;
        }
    };

    stockpile_app::init_tracing(config.log_filter());

    match stockpile_app::run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Startup failed");
            eprintln!("stockpile: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// `--config <path>` / `-c <path>`; anything else is ignored.
fn parse_config_arg(mut args: impl Iterator<Item = String>) -> Option<PathBuf> {
    while let Some(arg) = args.next() {
        if arg == "--config" || arg == "-c" {
            return args.next().map(PathBuf::from);
        }
    }
    None
}
