//! Shared components for CLI commands
//!
//! Logging setup, layered configuration loading, input discovery and
//! progress display used by more than one command.

use crate::app::services::workbook_reader::is_supported_file;
use crate::config::Config;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Set up structured logging on stderr
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("clinic_panel_processor={}", log_level)));

    let result = if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };

    result.map_err(|e| Error::configuration(format!("Failed to initialize logging: {}", e)))?;
    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration: defaults, then the config file, then environment
///
/// Without an explicit file the default location is used when it exists.
pub fn load_configuration(config_file: Option<&Path>) -> Result<Config> {
    let default_config_path = if config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = config_file.or_else(|| {
        default_config_path
            .as_deref()
            .filter(|path| path.exists())
    });

    match config_file {
        Some(path) => info!("Using config file: {}", path.display()),
        None => info!("No config file found, using defaults and environment variables"),
    }

    Config::load_layered(config_file)
}

/// Expand files and directories into the supported spreadsheet files they hold
///
/// Directories are walked recursively; hidden files and office lock files
/// (`~$name.xlsx`) are skipped. Explicitly named files are kept even with an
/// unknown extension so they fail visibly in the batch result. The result is
/// sorted and free of duplicates.
pub fn discover_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = BTreeSet::new();

    for input in inputs {
        if input.is_file() {
            files.insert(input.clone());
            continue;
        }

        for entry in WalkDir::new(input).follow_links(true) {
            let entry = entry.map_err(|e| {
                Error::directory_traversal(format!("Failed to walk {}", input.display()), e)
            })?;
            let path = entry.path();
            if entry.file_type().is_file() && is_supported_file(path) && !is_skipped_name(path) {
                files.insert(path.to_path_buf());
            }
        }
    }

    if files.is_empty() {
        warn!("No spreadsheet files found in the given inputs");
    } else {
        debug!("Discovered {} input files", files.len());
    }
    Ok(files.into_iter().collect())
}

fn is_skipped_name(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.starts_with('.') || name.starts_with("~$"))
}

/// Spinner shown while a batch runs
pub fn create_spinner(message: &str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message.to_string());
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner
}
