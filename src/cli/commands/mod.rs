//! Command implementations for the OSM processor CLI
//!
//! This module contains the command dispatch, while each command lives in
//! its own module.

pub mod process;
pub mod shared;

use crate::Result;
use crate::app::services::record_processor::ProcessingStats;
use crate::cli::args::{Args, Commands};

/// Main command runner for the OSM processor
///
/// Dispatches to the handler for the parsed subcommand.
pub async fn run(args: Args) -> Result<ProcessingStats> {
    match args.get_command()? {
        Commands::Process(process_args) => process::run_process(process_args).await,
    }
}
