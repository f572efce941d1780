//! Configuration management and validation.
//!
//! Provides configuration structures for output, batch limits, geocoding,
//! postal index location, header detection and column mapping, loaded in
//! layers: defaults, then a TOML file, then environment variables, then CLI
//! overrides.

use crate::app::models::{FormatKind, SourceField};
use crate::constants::{self, env_vars};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

/// Output file format for normalized sheets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

/// Lifetime of the geocode cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheScope {
    /// A fresh cache for every submitted batch
    #[default]
    Batch,
    /// One cache shared by every batch for the life of the process
    Process,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProcessingConfig {
    /// Directory normalized files are written to
    pub output_dir: PathBuf,

    /// Format of the normalized files
    pub output_format: OutputFormat,

    /// Extra termination lists applied to every panel sheet
    pub termination_files: Vec<PathBuf>,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
            output_format: OutputFormat::Csv,
            termination_files: Vec::new(),
        }
    }
}

/// Batch admission and execution limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Concurrent file tasks; 1 runs sequentially
    pub workers: usize,

    /// Batches that may wait for admission beyond the running ones
    pub queue_capacity: usize,

    /// Per-file size ceiling in MB
    pub max_file_size_mb: u64,

    /// Per-batch file count ceiling
    pub max_files_per_batch: usize,

    /// Per-file processing timeout
    pub file_timeout_secs: u64,

    /// Soft batch deadline
    pub batch_timeout_secs: u64,

    /// Time in-flight tasks get after the soft deadline
    pub batch_grace_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            workers: SystemProfile::detect().recommended_workers(),
            queue_capacity: constants::DEFAULT_QUEUE_CAPACITY,
            max_file_size_mb: constants::DEFAULT_MAX_FILE_SIZE_MB,
            max_files_per_batch: constants::DEFAULT_MAX_FILES_PER_BATCH,
            file_timeout_secs: constants::DEFAULT_FILE_TIMEOUT_SECS,
            batch_timeout_secs: constants::DEFAULT_BATCH_TIMEOUT_SECS,
            batch_grace_secs: constants::DEFAULT_BATCH_GRACE_SECS,
        }
    }
}

impl LimitsConfig {
    pub fn file_timeout(&self) -> Duration {
        Duration::from_secs(self.file_timeout_secs)
    }

    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    pub fn batch_grace(&self) -> Duration {
        Duration::from_secs(self.batch_grace_secs)
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }
}

/// External geocoding service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeocodingConfig {
    /// API key; the external service is disabled without one
    pub api_key: Option<String>,

    /// Geocoding endpoint URL
    pub endpoint: String,

    /// Per-request timeout
    pub request_timeout_ms: u64,

    /// In-flight requests per sheet
    pub concurrency: usize,

    /// Lifetime of the result cache
    pub cache_scope: CacheScope,
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: constants::DEFAULT_GEOCODE_ENDPOINT.to_string(),
            request_timeout_ms: constants::DEFAULT_GEOCODE_REQUEST_TIMEOUT_MS,
            concurrency: constants::DEFAULT_GEOCODE_CONCURRENCY,
            cache_scope: CacheScope::Batch,
        }
    }
}

impl GeocodingConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Whether an external service can be called
    pub fn is_enabled(&self) -> bool {
        self.api_key.as_deref().is_some_and(|key| !key.trim().is_empty())
    }
}

/// Postal code index location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostalIndexConfig {
    /// Candidate files, tried in order
    pub paths: Vec<PathBuf>,

    /// Candidates above this size are skipped
    pub max_file_size_mb: u64,
}

impl Default for PostalIndexConfig {
    fn default() -> Self {
        Self {
            paths: constants::DEFAULT_POSTAL_INDEX_PATHS
                .iter()
                .map(PathBuf::from)
                .collect(),
            max_file_size_mb: constants::DEFAULT_POSTAL_INDEX_MAX_FILE_SIZE_MB,
        }
    }
}

/// Header row detection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Rows scanned from the top of each sheet
    pub header_scan_rows: usize,

    /// A header row must match strictly more keywords than this
    pub keyword_threshold: usize,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            header_scan_rows: constants::DEFAULT_HEADER_SCAN_ROWS,
            keyword_threshold: constants::DEFAULT_KEYWORD_THRESHOLD,
        }
    }
}

/// Column mapping settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MappingConfig {
    /// Levenshtein tolerance for fuzzy header matches
    pub max_edit_distance: usize,

    /// Minimum synonym/header length ratio for containment matches
    pub min_containment_ratio: f64,

    /// Synonym overrides: format key (or `default` for every format) to
    /// source field key to replacement synonym list
    pub synonyms: HashMap<String, HashMap<String, Vec<String>>>,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            max_edit_distance: constants::DEFAULT_MAX_EDIT_DISTANCE,
            min_containment_ratio: constants::DEFAULT_MIN_CONTAINMENT_RATIO,
            synonyms: HashMap::new(),
        }
    }
}

impl MappingConfig {
    /// Synonym overrides that apply to a format, format-specific ones last
    pub fn overrides_for(&self, format: FormatKind) -> Vec<(SourceField, Vec<String>)> {
        let mut overrides = Vec::new();
        for key in ["default", format.key()] {
            if let Some(fields) = self.synonyms.get(key) {
                let mut entries: Vec<_> = fields
                    .iter()
                    .filter_map(|(field, synonyms)| {
                        field.parse::<SourceField>().ok().map(|f| (f, synonyms.clone()))
                    })
                    .collect();
                entries.sort_by_key(|(field, _)| *field);
                overrides.extend(entries);
            }
        }
        overrides
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub processing: ProcessingConfig,
    pub limits: LimitsConfig,
    pub geocoding: GeocodingConfig,
    pub postal_index: PostalIndexConfig,
    pub detection: DetectionConfig,
    pub mapping: MappingConfig,
}

impl Config {
    /// Default config file location in the user's config directory
    pub fn default_config_path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("clinic-panel-processor").join("config.toml"))
            .ok_or_else(|| Error::configuration("Could not determine user config directory"))
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::io(format!("Failed to read config file {}", path.display()), e)
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::configuration(format!(
                "Invalid config file {}: {}",
                path.display(),
                e
            ))
        })
    }

    /// Defaults, then the optional file, then environment overrides
    pub fn load_layered(config_file: Option<&Path>) -> Result<Self> {
        let mut config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    /// Apply environment overrides through a lookup function
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        if let Some(key) = non_empty(env_vars::GOOGLE_MAPS_API_KEY) {
            self.geocoding.api_key = Some(key);
        }
        if let Some(path) = non_empty(env_vars::POSTAL_CODE_MASTER_FILE) {
            self.postal_index.paths.insert(0, PathBuf::from(path));
        }
        if let Some(path) = non_empty(env_vars::POSTAL_CODE_FALLBACK_PATH) {
            let position = self.postal_index.paths.len().saturating_sub(1);
            self.postal_index.paths.insert(position, PathBuf::from(path));
        }
        if let Some(dir) = non_empty(env_vars::PROCESSED_FOLDER) {
            self.processing.output_dir = PathBuf::from(dir);
        }
        if let Some(workers) = non_empty(env_vars::PANEL_WORKERS) {
            self.limits.workers = workers.trim().parse().map_err(|_| {
                Error::configuration(format!(
                    "{} must be a positive integer, got '{}'",
                    env_vars::PANEL_WORKERS,
                    workers
                ))
            })?;
        }

        debug!("Applied environment overrides");
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.limits.workers == 0 {
            return Err(Error::configuration("limits.workers must be at least 1"));
        }
        if self.limits.max_files_per_batch == 0 {
            return Err(Error::configuration(
                "limits.max_files_per_batch must be at least 1",
            ));
        }
        if self.limits.file_timeout_secs == 0 || self.limits.batch_timeout_secs == 0 {
            return Err(Error::configuration("timeouts must be greater than zero"));
        }
        if self.geocoding.concurrency == 0 {
            return Err(Error::configuration(
                "geocoding.concurrency must be at least 1",
            ));
        }
        if self.detection.header_scan_rows == 0 {
            return Err(Error::configuration(
                "detection.header_scan_rows must be at least 1",
            ));
        }
        if !(0.0..=1.0).contains(&self.mapping.min_containment_ratio) {
            return Err(Error::configuration(
                "mapping.min_containment_ratio must be between 0 and 1",
            ));
        }

        for (format, fields) in &self.mapping.synonyms {
            if format != "default" {
                format.parse::<FormatKind>()?;
            }
            for (field, synonyms) in fields {
                field.parse::<SourceField>()?;
                if synonyms.iter().all(|s| s.trim().is_empty()) {
                    return Err(Error::configuration(format!(
                        "mapping.synonyms.{}.{} must list at least one synonym",
                        format, field
                    )));
                }
            }
        }

        Ok(())
    }

    /// Create output directory if it doesn't exist
    pub fn ensure_output_directory(&self) -> Result<()> {
        std::fs::create_dir_all(&self.processing.output_dir).map_err(|e| {
            Error::io(
                format!(
                    "Failed to create output directory {}",
                    self.processing.output_dir.display()
                ),
                e,
            )
        })
    }

    /// Set the worker count
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.limits.workers = workers;
        self
    }

    /// Set the output directory
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.processing.output_dir = output_dir.into();
        self
    }

    /// Set the per-file timeout
    pub fn with_file_timeout(mut self, timeout: Duration) -> Self {
        self.limits.file_timeout_secs = timeout.as_secs().max(1);
        self
    }

    /// Use only the given postal index candidates
    pub fn with_postal_index_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.postal_index.paths = paths;
        self
    }
}

/// System profiling information for sizing the worker pool
#[derive(Debug, Clone)]
pub struct SystemProfile {
    /// Number of CPU cores available
    pub cpu_cores: usize,
    /// Total memory in MB
    pub memory_mb: usize,
}

impl SystemProfile {
    /// Auto-detect system capabilities
    pub fn detect() -> Self {
        use sysinfo::System;

        let mut system = System::new();
        system.refresh_memory();

        Self {
            cpu_cores: num_cpus::get(),
            memory_mb: (system.total_memory() / 1024 / 1024) as usize,
        }
    }

    /// Worker count suited to this machine
    ///
    /// Whole workbooks are held in memory per worker, so small machines get
    /// fewer workers than cores.
    pub fn recommended_workers(&self) -> usize {
        let by_memory = (self.memory_mb / 1024).max(1);
        self.cpu_cores
            .min(by_memory)
            .clamp(1, constants::MAX_DEFAULT_WORKERS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.processing.output_format, OutputFormat::Csv);
        assert_eq!(config.geocoding.cache_scope, CacheScope::Batch);
        assert!(!config.geocoding.is_enabled());
        assert!(config.limits.workers >= 1 && config.limits.workers <= 4);
    }

    #[test]
    fn test_from_file_partial_toml() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[limits]
workers = 2
file_timeout_secs = 30

[processing]
output_format = "parquet"

[mapping.synonyms.standard]
code = ["provider ref"]
"#,
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.limits.workers, 2);
        assert_eq!(config.limits.file_timeout_secs, 30);
        assert_eq!(config.processing.output_format, OutputFormat::Parquet);
        // Untouched sections keep their defaults
        assert_eq!(config.detection.header_scan_rows, 10);
        assert!(config.validate().is_ok());

        let overrides = config.mapping.overrides_for(FormatKind::Standard);
        assert_eq!(overrides, vec![(SourceField::Code, vec!["provider ref".to_string()])]);
        assert!(config.mapping.overrides_for(FormatKind::MergedMultiLevel).is_empty());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        let env: HashMap<&str, &str> = [
            ("GOOGLE_MAPS_API_KEY", "secret"),
            ("POSTAL_CODE_MASTER_FILE", "/data/master.xlsx"),
            ("PANEL_WORKERS", "3"),
        ]
        .into_iter()
        .collect();

        config
            .apply_env_overrides(|name| env.get(name).map(|v| v.to_string()))
            .unwrap();

        assert!(config.geocoding.is_enabled());
        assert_eq!(
            config.postal_index.paths[0],
            PathBuf::from("/data/master.xlsx")
        );
        assert_eq!(config.limits.workers, 3);
    }

    #[test]
    fn test_env_override_rejects_bad_worker_count() {
        let mut config = Config::default();
        let result = config.apply_env_overrides(|name| {
            (name == "PANEL_WORKERS").then(|| "many".to_string())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_rejects_unknown_synonym_field() {
        let mut config = Config::default();
        config.mapping.synonyms.insert(
            "standard".to_string(),
            [("fax".to_string(), vec!["fax no".to_string()])]
                .into_iter()
                .collect(),
        );
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_workers() {
        assert!(Config::default().with_workers(0).validate().is_err());
    }

    #[test]
    fn test_recommended_workers_bounds() {
        let small = SystemProfile {
            cpu_cores: 8,
            memory_mb: 512,
        };
        assert_eq!(small.recommended_workers(), 1);

        let large = SystemProfile {
            cpu_cores: 32,
            memory_mb: 65_536,
        };
        assert_eq!(large.recommended_workers(), 4);
    }
}
