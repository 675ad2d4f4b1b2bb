//! Command implementations for the m.life processor CLI
//!
//! Each command lives in its own module; `shared` holds the logging,
//! progress and summary helpers they have in common.

pub mod check;
pub mod process;
pub mod shared;

pub use shared::ProcessingStats;

use crate::cli::args::{Args, Commands};

/// Main command runner: dispatches to the subcommand handler
pub async fn run(args: Args) -> anyhow::Result<ProcessingStats> {
    match args.get_command() {
        Commands::Process(process_args) => process::run_process(process_args).await,
        Commands::Check(check_args) => check::run_check(check_args).await,
    }
}
