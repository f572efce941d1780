//! Postal index loading statistics

use std::path::PathBuf;

/// Statistics about the postal index loading process
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    /// Candidate files that were examined
    pub files_attempted: usize,

    /// File the index was finally loaded from
    pub source: Option<PathBuf>,

    /// Number of postal codes loaded
    pub records_loaded: usize,

    /// Rows skipped for a missing or invalid code or coordinate
    pub records_skipped: usize,

    /// Time taken to load the index
    pub load_duration: std::time::Duration,

    /// Problems encountered with candidate files
    pub errors: Vec<String>,
}

impl LoadStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Get a summary string of the loading process
    pub fn summary(&self) -> String {
        match &self.source {
            Some(source) => format!(
                "Loaded {} postal codes from {} ({} rows skipped) in {:.2}s",
                self.records_loaded,
                source.display(),
                self.records_skipped,
                self.load_duration.as_secs_f64()
            ),
            None => format!(
                "No postal index loaded after trying {} candidate files",
                self.files_attempted
            ),
        }
    }
}
