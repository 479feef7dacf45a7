//! Bike Fleet Engine CLI
//!
//! Command-line interface for replaying bike fleet lifecycle events from a
//! CSV log.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- events.csv > sanctions.csv
//! ```
//!
//! The program reads timestamped fleet events from the input CSV file,
//! replays them through the lifecycle engine, and outputs the final
//! sanction states to stdout.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, file not readable, etc.)

use bike_fleet_engine::cli;
use bike_fleet_engine::replay;
use std::process;

fn main() {
    let args = cli::parse_args();

    // Per-row failures are logged to stderr inside the replay; only fatal
    // errors end up here. Output goes to stdout.
    let mut output = std::io::stdout();
    if let Err(e) = replay::replay_events(&args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
