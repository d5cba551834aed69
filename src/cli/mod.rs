//! CLI module for the parking registry
//!
//! Provides command-line interface for:
//! - init: Create an empty data file
//! - exec: Serve JSON commands from stdin
//! - seed: Bulk-load records from a file

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, EntityArg};
pub use commands::{exec, init, run_command, seed, serve};
pub use errors::{CliError, CliResult};
pub use io::{next_line, read_records, write_reply};

/// Parse arguments and run the selected command
pub async fn run() -> CliResult<()> {
    run_command(Cli::parse_args().command).await
}
