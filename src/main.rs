//! Points Engine CLI
//!
//! Command-line interface for replaying point operations from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > balances.csv
//! cargo run -- --batch-size 2000 --max-concurrent 8 operations.csv > balances.csv
//! cargo run -- --max-balance 1000000 operations.csv > balances.csv
//! ```
//!
//! The program reads operation records from the input CSV file, applies them
//! through the points engine with per-user locking, and writes the final
//! balances to stdout. Diagnostics go to stderr so stdout stays valid CSV.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use points_engine::cli;
use points_engine::core::replay::replay_file;
use std::process;

fn main() {
    // Diagnostics on stderr, stdout carries the balance CSV
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // Parse command-line arguments using clap
    let args = cli::parse_args();
    let config = args.to_replay_config();

    // Replay operations from the input file
    // Output goes to stdout
    let mut output = std::io::stdout();
    if let Err(e) = replay_file(&args.input_file, &config, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
