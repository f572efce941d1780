//! Command-line argument definitions for the clinic panel processor
//!
//! This module defines the CLI interface using the clap derive API.

use crate::config::OutputFormat;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Upper bound accepted for `--workers`
const MAX_CLI_WORKERS: usize = 64;

/// CLI arguments for the clinic panel processor
///
/// Normalizes clinic-panel spreadsheets from different insurers into one
/// geocoded record layout.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "clinic-panel-processor",
    version,
    about = "Normalize clinic-panel spreadsheets into a single geocoded schema",
    long_about = "Reads clinic-panel workbooks (xlsx, xls, ods, csv) in any of the known insurer \
                  layouts, maps their columns onto one canonical record, geocodes each clinic from \
                  a postal code index with an optional external fallback, drops terminated clinics \
                  and writes one normalized file per sheet."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Process a batch of panel spreadsheets
    Process(ProcessArgs),
    /// Resolve a single postal code or address to coordinates
    Geocode(GeocodeArgs),
}

/// Arguments for the process command
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Input files or directories
    ///
    /// Directories are searched recursively for supported spreadsheet files.
    #[arg(value_name = "INPUT", required = true, num_args = 1..)]
    pub inputs: Vec<PathBuf>,

    /// Output directory for normalized files
    #[arg(
        short = 'o',
        long = "output",
        value_name = "DIR",
        help = "Output directory for normalized files"
    )]
    pub output_dir: Option<PathBuf>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// clinic-panel-processor/config.toml in the user config directory.
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Number of files processed concurrently; 1 runs sequentially
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of files processed concurrently"
    )]
    pub workers: Option<usize>,

    /// Extra termination lists applied to every panel sheet
    #[arg(
        long = "termination",
        value_name = "FILE",
        help = "Termination list applied to every panel sheet (repeatable)"
    )]
    pub termination: Vec<PathBuf>,

    /// Format of the normalized files
    #[arg(long = "format", value_enum, help = "Output file format")]
    pub format: Option<FormatArg>,

    /// Batch identifier used as the output file prefix
    #[arg(
        long = "batch-id",
        value_name = "ID",
        help = "Batch identifier (default: random 8 characters)"
    )]
    pub batch_id: Option<String>,

    /// Print the batch result as JSON on stdout
    #[arg(long = "json", help = "Print the batch result as JSON")]
    pub json: bool,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the geocode command
#[derive(Debug, Clone, Parser)]
pub struct GeocodeArgs {
    /// Postal code to look up
    #[arg(long = "postal-code", value_name = "CODE")]
    pub postal_code: Option<String>,

    /// Address to geocode when the postal code is not indexed
    #[arg(long = "address", value_name = "TEXT")]
    pub address: Option<String>,

    /// Path to configuration file
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,
}

/// Output file format as given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Csv,
    Parquet,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Parquet => OutputFormat::Parquet,
        }
    }
}

/// Log level for a verbosity count
fn log_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

fn check_config_file(config_file: &Option<PathBuf>) -> Result<()> {
    if let Some(config_file) = config_file {
        if !config_file.exists() {
            return Err(Error::configuration(format!(
                "Config file does not exist: {}",
                config_file.display()
            )));
        }
    }
    Ok(())
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        for input in &self.inputs {
            if !input.exists() {
                return Err(Error::configuration(format!(
                    "Input path does not exist: {}",
                    input.display()
                )));
            }
        }

        for termination in &self.termination {
            if !termination.is_file() {
                return Err(Error::configuration(format!(
                    "Termination file does not exist: {}",
                    termination.display()
                )));
            }
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0",
                ));
            }
            if workers > MAX_CLI_WORKERS {
                return Err(Error::configuration(format!(
                    "Number of workers cannot exceed {}",
                    MAX_CLI_WORKERS
                )));
            }
        }

        if let Some(batch_id) = &self.batch_id {
            let valid = !batch_id.is_empty()
                && batch_id
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
            if !valid {
                return Err(Error::configuration(format!(
                    "Batch id '{}' may only contain letters, digits, '-' and '_'",
                    batch_id
                )));
            }
        }

        check_config_file(&self.config_file)
    }

    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, self.quiet)
    }

    /// Spinner and colored summary only for interactive, non-JSON runs
    pub fn show_progress(&self) -> bool {
        !self.quiet && !self.json
    }
}

impl GeocodeArgs {
    pub fn validate(&self) -> Result<()> {
        let blank = |value: &Option<String>| value.as_deref().is_none_or(|v| v.trim().is_empty());
        if blank(&self.postal_code) && blank(&self.address) {
            return Err(Error::configuration(
                "Provide --postal-code or --address",
            ));
        }
        check_config_file(&self.config_file)
    }

    pub fn get_log_level(&self) -> &'static str {
        log_level(self.verbose, false)
    }
}
