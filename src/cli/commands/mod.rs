//! Command implementations for the clinic panel processor CLI
//!
//! Each command is implemented in its own module:
//! - `process`: batch normalization of panel spreadsheets
//! - `geocode`: single postal code or address lookup

pub mod geocode;
pub mod process;
pub mod shared;

use crate::app::services::batch::{BatchResult, FileResultStatus};
use crate::cli::args::{Args, Commands};
use crate::{Error, Result};
use tokio_util::sync::CancellationToken;

/// What a command run produced, used for the process exit code
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub files_succeeded: usize,
    pub files_partial: usize,
    pub files_failed: usize,
    pub records_processed: usize,
    pub lookups_failed: usize,
}

impl RunSummary {
    pub fn from_batch(result: &BatchResult) -> Self {
        Self {
            files_succeeded: result.count(FileResultStatus::Success),
            files_partial: result.count(FileResultStatus::Partial),
            files_failed: result.count(FileResultStatus::Failed),
            records_processed: result.records_processed(),
            lookups_failed: 0,
        }
    }

    /// Whether everything requested completed without failures
    pub fn is_clean(&self) -> bool {
        self.files_partial == 0 && self.files_failed == 0 && self.lookups_failed == 0
    }
}

/// Dispatch to the requested subcommand
pub async fn run(args: Args, cancellation: CancellationToken) -> Result<RunSummary> {
    match args.command {
        Some(Commands::Process(process_args)) => {
            process::run_process(process_args, cancellation).await
        }
        Some(Commands::Geocode(geocode_args)) => geocode::run_geocode(geocode_args).await,
        None => Err(Error::configuration("No command given")),
    }
}
