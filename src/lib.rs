//! Clinic Panel Processor Library
//!
//! A Rust library for normalizing heterogeneous clinic-panel spreadsheet
//! exports into a single canonical, geocoded record schema.
//!
//! This library provides tools for:
//! - Reading xlsx/xls/ods/csv workbooks into raw cell matrices with merged ranges
//! - Detecting which of the known panel layouts a sheet uses
//! - Locating header rows and mapping source columns through synonym tables
//! - Deriving canonical fields (hours, phone, address, postal code, country)
//! - Geocoding by postal-code index with an external API fallback and cache
//! - Removing terminated clinics listed on termination sheets
//! - Running whole batches of files concurrently with timeouts and isolation

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod batch;
        pub mod column_mapper;
        pub mod field_rules;
        pub mod format_detector;
        pub mod geocoding;
        pub mod output_writer;
        pub mod postal_index;
        pub mod sheet_processor;
        pub mod termination_filter;
        pub mod workbook_reader;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FormatKind, NormalizedRecord, RawSheet, SourceField};
pub use config::Config;

use serde::{Deserialize, Serialize};

/// Result type alias for the clinic panel processor
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for panel processing operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// CSV parsing error
    #[error("CSV parsing error in file '{file}': {message}")]
    CsvParsing {
        file: String,
        message: String,
        #[source]
        source: Option<csv::Error>,
    },

    /// Workbook could not be opened or a sheet could not be read
    #[error("Workbook error in file '{file}': {message}")]
    Workbook { file: String, message: String },

    /// Input rejected before processing (unsupported type, size ceiling)
    #[error("Input error for '{file}': {message}")]
    Input { file: String, message: String },

    /// No known layout signature matched the sheet
    #[error("Structural error in sheet '{sheet}': {message} (attempted: {})", attempted.join(", "))]
    Structural {
        sheet: String,
        message: String,
        attempted: Vec<String>,
    },

    /// Mandatory source columns could not be mapped
    #[error("Mapping error in sheet '{sheet}': missing mandatory fields [{}]", missing.join(", "))]
    Mapping { sheet: String, missing: Vec<String> },

    /// A task exceeded its time budget
    #[error("Timeout: '{task}' did not finish within {seconds}s")]
    Timeout { task: String, seconds: u64 },

    /// External geocoding service unreachable or refused the request
    #[error("Geocoding unavailable: {message}")]
    GeocodeUnavailable { message: String },

    /// Batch refused at admission
    #[error("Batch rejected: {reason}")]
    BatchRejected { reason: String },

    /// Output file writing error
    #[error("Output writing error: {message}")]
    OutputWriting {
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    ProcessingInterrupted { reason: String },
}

/// Error classification carried into serialized sheet and file results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    StructuralError,
    MappingError,
    TimeoutError,
    GeocodeUnavailable,
    InputError,
    BatchRejected,
    OutputError,
    ConfigurationError,
    Interrupted,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ErrorKind::StructuralError => "StructuralError",
            ErrorKind::MappingError => "MappingError",
            ErrorKind::TimeoutError => "TimeoutError",
            ErrorKind::GeocodeUnavailable => "GeocodeUnavailable",
            ErrorKind::InputError => "InputError",
            ErrorKind::BatchRejected => "BatchRejected",
            ErrorKind::OutputError => "OutputError",
            ErrorKind::ConfigurationError => "ConfigurationError",
            ErrorKind::Interrupted => "Interrupted",
        };
        f.write_str(name)
    }
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV parsing error with context
    pub fn csv_parsing(
        file: impl Into<String>,
        message: impl Into<String>,
        source: Option<csv::Error>,
    ) -> Self {
        Self::CsvParsing {
            file: file.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a workbook read error
    pub fn workbook(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Workbook {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create an input rejection error
    pub fn input(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Input {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a structural error listing the signatures that were tried
    pub fn structural(
        sheet: impl Into<String>,
        message: impl Into<String>,
        attempted: Vec<String>,
    ) -> Self {
        Self::Structural {
            sheet: sheet.into(),
            message: message.into(),
            attempted,
        }
    }

    /// Create a mapping error naming the missing fields
    pub fn mapping(sheet: impl Into<String>, missing: Vec<String>) -> Self {
        Self::Mapping {
            sheet: sheet.into(),
            missing,
        }
    }

    /// Create a timeout error
    pub fn timeout(task: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            task: task.into(),
            seconds,
        }
    }

    /// Create a geocoding unavailable error
    pub fn geocode_unavailable(message: impl Into<String>) -> Self {
        Self::GeocodeUnavailable {
            message: message.into(),
        }
    }

    /// Create a batch rejection error
    pub fn batch_rejected(reason: impl Into<String>) -> Self {
        Self::BatchRejected {
            reason: reason.into(),
        }
    }

    /// Create an output writing error
    pub fn output_writing(
        message: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        Self::OutputWriting {
            message: message.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a processing interrupted error
    pub fn processing_interrupted(reason: impl Into<String>) -> Self {
        Self::ProcessingInterrupted {
            reason: reason.into(),
        }
    }

    /// Classify this error for structured results
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Structural { .. } => ErrorKind::StructuralError,
            Error::Mapping { .. } => ErrorKind::MappingError,
            Error::Timeout { .. } => ErrorKind::TimeoutError,
            Error::GeocodeUnavailable { .. } => ErrorKind::GeocodeUnavailable,
            Error::BatchRejected { .. } => ErrorKind::BatchRejected,
            Error::OutputWriting { .. } => ErrorKind::OutputError,
            Error::Configuration { .. } => ErrorKind::ConfigurationError,
            Error::ProcessingInterrupted { .. } => ErrorKind::Interrupted,
            Error::Io { .. }
            | Error::CsvParsing { .. }
            | Error::Workbook { .. }
            | Error::Input { .. }
            | Error::DirectoryTraversal { .. } => ErrorKind::InputError,
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvParsing {
            file: "unknown".to_string(),
            message: "CSV parsing failed".to_string(),
            source: Some(error),
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

impl From<polars::prelude::PolarsError> for Error {
    fn from(error: polars::prelude::PolarsError) -> Self {
        Self::OutputWriting {
            message: "DataFrame operation failed".to_string(),
            source: Box::new(error),
        }
    }
}
