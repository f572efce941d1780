//! Serializable batch, file and sheet results

use crate::app::models::FormatKind;
use crate::app::services::geocoding::GeocodeStats;
use crate::app::services::sheet_processor::SheetOutput;
use crate::{Error, ErrorKind};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;

/// Error details attached to a failed result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&Error> for ErrorInfo {
    fn from(error: &Error) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Geocoding figures as reported per sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodingSummary {
    /// Formatted like `95.0%`
    pub success_rate: String,
    pub successful_geocodes: usize,
    pub total_records: usize,
    pub postal_code_matches: usize,
    pub address_geocodes: usize,
    pub failed_geocodes: usize,
}

impl From<&GeocodeStats> for GeocodingSummary {
    fn from(stats: &GeocodeStats) -> Self {
        Self {
            success_rate: stats.success_rate_display(),
            successful_geocodes: stats.successful_geocodes,
            total_records: stats.total_records,
            postal_code_matches: stats.postal_code_matches,
            address_geocodes: stats.address_geocodes,
            failed_geocodes: stats.failed_geocodes,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SheetStatus {
    Success,
    Failed,
}

/// Outcome of one panel sheet
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetResult {
    pub sheet_name: String,
    pub status: SheetStatus,
    pub reason: Option<String>,
    pub format: Option<FormatKind>,
    /// First written file, if any
    pub output_file_path: Option<PathBuf>,
    pub output_files: Vec<PathBuf>,
    pub records_processed: usize,
    pub terminated_clinics_filtered: usize,
    pub metadata_rows: usize,
    pub field_failures: BTreeMap<String, usize>,
    pub geocoding_stats: Option<GeocodingSummary>,
    pub error: Option<ErrorInfo>,
}

impl SheetResult {
    /// A processed sheet and the files written for it
    pub fn success(output: &SheetOutput, files: Vec<PathBuf>) -> Self {
        Self {
            sheet_name: output.sheet_name.clone(),
            status: SheetStatus::Success,
            reason: None,
            format: Some(output.format),
            output_file_path: files.first().cloned(),
            output_files: files,
            records_processed: output.stats.records_out,
            terminated_clinics_filtered: output.stats.terminated_filtered,
            metadata_rows: output.stats.metadata_rows,
            field_failures: output.stats.field_failures.clone(),
            geocoding_stats: Some(GeocodingSummary::from(&output.stats.geocode)),
            error: None,
        }
    }

    pub fn failed(sheet_name: impl Into<String>, error: &Error) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            status: SheetStatus::Failed,
            reason: Some(error.kind().to_string()),
            format: None,
            output_file_path: None,
            output_files: Vec::new(),
            records_processed: 0,
            terminated_clinics_filtered: 0,
            metadata_rows: 0,
            field_failures: BTreeMap::new(),
            geocoding_stats: None,
            error: Some(ErrorInfo::from(error)),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == SheetStatus::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileResultStatus {
    Success,
    Partial,
    Failed,
}

impl fmt::Display for FileResultStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            FileResultStatus::Success => "success",
            FileResultStatus::Partial => "partial",
            FileResultStatus::Failed => "failed",
        };
        f.write_str(label)
    }
}

/// Outcome of one input file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileResult {
    pub file: String,
    pub status: FileResultStatus,
    pub reason: Option<String>,
    pub sheets: Vec<SheetResult>,
    pub error: Option<ErrorInfo>,
}

impl FileResult {
    /// Derive the file status from its sheets
    pub fn from_sheets(file: impl Into<String>, sheets: Vec<SheetResult>) -> Self {
        let succeeded = sheets.iter().filter(|s| s.is_success()).count();
        let status = if succeeded == sheets.len() && succeeded > 0 {
            FileResultStatus::Success
        } else if succeeded > 0 {
            FileResultStatus::Partial
        } else {
            FileResultStatus::Failed
        };
        let reason = match status {
            FileResultStatus::Success => None,
            FileResultStatus::Partial => Some(format!(
                "{} of {} sheets failed",
                sheets.len() - succeeded,
                sheets.len()
            )),
            FileResultStatus::Failed if sheets.is_empty() => Some("no panel sheets found".to_string()),
            FileResultStatus::Failed => Some("all sheets failed".to_string()),
        };

        Self {
            file: file.into(),
            status,
            reason,
            sheets,
            error: None,
        }
    }

    /// The whole file failed before or outside sheet processing
    pub fn failed(file: impl Into<String>, error: &Error) -> Self {
        Self {
            file: file.into(),
            status: FileResultStatus::Failed,
            reason: Some(error.kind().to_string()),
            sheets: Vec::new(),
            error: Some(ErrorInfo::from(error)),
        }
    }

    pub fn records_processed(&self) -> usize {
        self.sheets.iter().map(|s| s.records_processed).sum()
    }

    pub fn output_files(&self) -> impl Iterator<Item = &PathBuf> {
        self.sheets.iter().flat_map(|s| s.output_files.iter())
    }
}

/// Outcome of a whole batch, files in submission order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchResult {
    pub batch_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub results: Vec<FileResult>,
}

impl BatchResult {
    pub fn count(&self, status: FileResultStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn records_processed(&self) -> usize {
        self.results.iter().map(FileResult::records_processed).sum()
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
