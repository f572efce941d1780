//! Batch jobs and their file tasks

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Lifecycle of one file within a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FileStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl FileStatus {
    fn rank(self) -> u8 {
        match self {
            FileStatus::Pending => 0,
            FileStatus::Processing => 1,
            FileStatus::Completed | FileStatus::Failed => 2,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// One input file of a batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTask {
    pub index: usize,
    pub path: PathBuf,
    status: FileStatus,
}

impl FileTask {
    pub fn new(index: usize, path: PathBuf) -> Self {
        Self {
            index,
            path,
            status: FileStatus::Pending,
        }
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    /// Move the task forward; regressions and repeated terminal moves are ignored
    pub fn advance(&mut self, next: FileStatus) -> bool {
        if next.rank() <= self.status.rank() {
            warn!(
                "Ignoring status change {} -> {} for {}",
                self.status,
                next,
                self.path.display()
            );
            return false;
        }
        debug!("{}: {} -> {}", self.path.display(), self.status, next);
        self.status = next;
        true
    }

    /// File name for logs and results
    pub fn display_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// A submitted set of files
#[derive(Debug, Clone)]
pub struct BatchJob {
    pub batch_id: String,
    pub created_at: DateTime<Utc>,
    pub tasks: Vec<FileTask>,
}

impl BatchJob {
    pub fn new(batch_id: impl Into<String>, files: Vec<PathBuf>) -> Self {
        Self {
            batch_id: batch_id.into(),
            created_at: Utc::now(),
            tasks: files
                .into_iter()
                .enumerate()
                .map(|(index, path)| FileTask::new(index, path))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Number of tasks in a given status
    pub fn count(&self, status: FileStatus) -> usize {
        self.tasks.iter().filter(|t| t.status == status).count()
    }
}
