//! Postal index loading and candidate file discovery
//!
//! The master file is a spreadsheet (xlsx or csv) with PostalCode, Latitude
//! and Longitude columns. Candidate locations are tried in order; the first
//! one that exists, fits under the size limit and parses wins. A missing
//! index is not an error: lookups simply miss and geocoding falls through to
//! the external service.

use super::metadata::LoadStats;
use super::{PostalCodeIndex, normalize_postal_key};
use crate::app::models::{Coordinates, RawSheet};
use crate::app::services::workbook_reader::read_workbook;
use crate::config::PostalIndexConfig;
use crate::{Error, Result};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Rows scanned for the PostalCode/Latitude/Longitude header
const HEADER_SEARCH_ROWS: usize = 10;

struct ColumnPositions {
    header_row: usize,
    postal: usize,
    latitude: usize,
    longitude: usize,
}

fn header_key(label: &str) -> String {
    label
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>()
        .to_ascii_lowercase()
}

fn locate_columns(sheet: &RawSheet) -> Option<ColumnPositions> {
    (0..sheet.row_count().min(HEADER_SEARCH_ROWS)).find_map(|row| {
        let keys: Vec<String> = sheet.row(row).iter().map(|c| header_key(c)).collect();
        let find = |predicate: &dyn Fn(&str) -> bool| keys.iter().position(|k| predicate(k));

        Some(ColumnPositions {
            header_row: row,
            postal: find(&|k| k.contains("postal") || k == "postcode" || k == "zip")?,
            latitude: find(&|k| k.starts_with("lat"))?,
            longitude: find(&|k| k.starts_with("lng") || k.starts_with("lon"))?,
        })
    })
}

impl PostalCodeIndex {
    /// Load the index from the first usable candidate path
    ///
    /// Never fails; problems are logged and recorded in the returned stats.
    pub fn load(config: &PostalIndexConfig) -> (Self, LoadStats) {
        let start_time = Instant::now();
        let mut stats = LoadStats::new();
        let max_bytes = config.max_file_size_mb * 1024 * 1024;

        for path in &config.paths {
            stats.files_attempted += 1;

            let size = match std::fs::metadata(path) {
                Ok(metadata) => metadata.len(),
                Err(_) => {
                    debug!("Postal index candidate not found: {}", path.display());
                    continue;
                }
            };

            if size > max_bytes {
                let message = format!(
                    "{} is {}MB, above the {}MB limit",
                    path.display(),
                    size / 1024 / 1024,
                    config.max_file_size_mb
                );
                warn!("Skipping postal index candidate: {}", message);
                stats.errors.push(message);
                continue;
            }

            match Self::load_file(path) {
                Ok((index, file_stats)) => {
                    stats.source = file_stats.source;
                    stats.records_loaded = file_stats.records_loaded;
                    stats.records_skipped = file_stats.records_skipped;
                    stats.load_duration = start_time.elapsed();
                    info!("{}", stats.summary());
                    return (index, stats);
                }
                Err(e) => {
                    warn!("Failed to load postal index from {}: {}", path.display(), e);
                    stats.errors.push(e.to_string());
                }
            }
        }

        stats.load_duration = start_time.elapsed();
        warn!(
            "Postal code index unavailable; lookups will fall back to the geocoding service ({})",
            stats.summary()
        );
        (Self::new(), stats)
    }

    /// Load the index from one master file
    pub fn load_file(path: &Path) -> Result<(Self, LoadStats)> {
        let start_time = Instant::now();
        let workbook = read_workbook(path)?;
        let path_label = path.display().to_string();

        let sheet = workbook
            .sheets
            .first()
            .ok_or_else(|| Error::input(&path_label, "postal index workbook has no sheets"))?;
        let columns = locate_columns(sheet).ok_or_else(|| {
            Error::input(
                &path_label,
                "postal index needs PostalCode, Latitude and Longitude columns",
            )
        })?;

        let mut index = Self::new();
        let mut stats = LoadStats::new();
        stats.files_attempted = 1;

        for row in (columns.header_row + 1)..sheet.row_count() {
            let code = normalize_postal_key(sheet.cell(row, columns.postal));
            let latitude = sheet.cell(row, columns.latitude).parse::<f64>().ok();
            let longitude = sheet.cell(row, columns.longitude).parse::<f64>().ok();

            match (code, latitude, longitude) {
                (Some(code), Some(latitude), Some(longitude)) => {
                    index
                        .entries
                        .insert(code, Coordinates::new(latitude, longitude));
                }
                _ => stats.records_skipped += 1,
            }
        }

        index.source = Some(path.to_path_buf());
        index.load_time = Instant::now();
        stats.source = Some(path.to_path_buf());
        stats.records_loaded = index.len();
        stats.load_duration = start_time.elapsed();

        debug!(
            "Parsed postal index {}: {} codes, {} rows skipped",
            path_label, stats.records_loaded, stats.records_skipped
        );

        Ok((index, stats))
    }
}
