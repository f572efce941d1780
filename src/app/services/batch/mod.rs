//! Batch processing of panel spreadsheets
//!
//! A batch is a set of input files submitted together. Each file becomes a
//! [`FileTask`]; tasks run on a worker pool bounded by a semaphore and each
//! task processes its panel sheets in order. A file that fails (too large,
//! unreadable, timed out) never stops its siblings.
//!
//! Deadlines:
//! - per file: the configured file timeout, capped by the batch hard deadline
//! - batch soft deadline: no file or sheet starts after it
//! - batch hard deadline (soft + grace): in-flight files are abandoned
//!
//! Output files are written only after a file's processing finishes, so an
//! abandoned file leaves nothing behind.
//!
//! # Modules
//!
//! - [`job`] - Batch jobs and file task lifecycle
//! - [`gauge`] - In-flight task observation
//! - [`orchestrator`] - Admission, worker pool and deadlines
//! - [`results`] - Serializable batch, file and sheet results

pub mod gauge;
pub mod job;
pub mod orchestrator;
pub mod results;

#[cfg(test)]
pub mod tests;

pub use gauge::{ConcurrencyGauge, GaugeGuard};
pub use job::{BatchJob, FileStatus, FileTask};
pub use orchestrator::BatchOrchestrator;
pub use results::{
    BatchResult, ErrorInfo, FileResult, FileResultStatus, GeocodingSummary, SheetResult,
    SheetStatus,
};
