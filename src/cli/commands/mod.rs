//! Command implementations for the swath retriever CLI
//!
//! Each subcommand lives in its own module; this module only dispatches.

pub mod aois;
pub mod job;
pub mod shared;

pub use shared::RunStats;

use crate::cli::args::{Args, Commands};
use crate::{Error, Result};

/// Dispatch to the subcommand handler
pub async fn run(args: Args) -> Result<RunStats> {
    match args.command {
        Some(Commands::Run(run_args)) => job::run_job(run_args).await,
        Some(Commands::Aois(aois_args)) => {
            aois::run_aois(&aois_args);
            Ok(RunStats::default())
        }
        None => Err(Error::configuration("no command given")),
    }
}
