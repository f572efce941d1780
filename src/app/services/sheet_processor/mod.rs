//! Single-sheet processing pipeline
//!
//! A panel sheet moves through a fixed sequence of states:
//!
//! ```text
//! Detecting -> HeaderLocating -> Mapping -> Transforming -> Geocoding -> Filtering -> Done
//! ```
//!
//! Only structural problems (unrecognized layout, no header row, missing
//! Code/Name columns) move a sheet to `Failed`. Row-level rule failures are
//! counted in [`SheetStats`] and never abort the sheet.
//!
//! # Modules
//!
//! - [`state`] - Processing states
//! - [`stats`] - Per-sheet counters
//! - [`transform`] - Row to record transformation

pub mod state;
pub mod stats;
pub mod transform;

#[cfg(test)]
pub mod tests;

pub use state::ProcessingState;
pub use stats::SheetStats;
pub use transform::{RowTransform, transform_row};

use crate::app::models::{Country, FormatKind, NormalizedRecord, RawSheet, RowKind};
use crate::app::services::column_mapper::{ColumnMapper, build_header_layout};
use crate::app::services::format_detector::{FormatDetector, unmerge};
use crate::app::services::geocoding::GeocodingResolver;
use crate::app::services::termination_filter::TerminationSet;
use crate::config::Config;
use crate::constants::GEOCODE_YIELD_INTERVAL;
use crate::{Error, Result};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Records of one country from one sheet
#[derive(Debug, Clone, PartialEq)]
pub struct CountryPartition {
    pub country: Country,
    pub records: Vec<NormalizedRecord>,
}

/// Result of a successfully processed sheet
#[derive(Debug, Clone)]
pub struct SheetOutput {
    pub sheet_name: String,
    pub format: FormatKind,
    /// Non-empty partitions, Singapore first
    pub partitions: Vec<CountryPartition>,
    pub stats: SheetStats,
}

impl SheetOutput {
    pub fn record_count(&self) -> usize {
        self.partitions.iter().map(|p| p.records.len()).sum()
    }
}

/// Tracks the current state of one sheet run
struct SheetRun {
    sheet: String,
    state: ProcessingState,
}

impl SheetRun {
    fn new(sheet: &str) -> Self {
        Self {
            sheet: sheet.to_string(),
            state: ProcessingState::Detecting,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.state.next() {
            debug!("Sheet '{}': {} -> {}", self.sheet, self.state, next);
            self.state = next;
        }
    }

    fn fail(&mut self, error: Error) -> Error {
        warn!("Sheet '{}' failed while {}: {}", self.sheet, self.state, error);
        self.state = ProcessingState::Failed;
        error
    }
}

/// A sheet after detection, mapping and row transformation
struct PreparedSheet {
    format: FormatKind,
    records: Vec<NormalizedRecord>,
    stats: SheetStats,
    run: SheetRun,
}

/// Detect, map and transform a sheet
///
/// Pure CPU work with no await points; callers run it on the blocking pool.
fn prepare_sheet(
    detector: &FormatDetector,
    mapper: &ColumnMapper,
    sheet: &RawSheet,
) -> Result<PreparedSheet> {
    let mut run = SheetRun::new(&sheet.name);
    let mut stats = SheetStats::default();

    // Detecting
    let sheet = unmerge(sheet);
    let detection = detector.detect(&sheet).map_err(|e| run.fail(e))?;
    run.advance();

    // HeaderLocating
    let header_row = detector
        .locate_header(&sheet, detection.kind)
        .ok_or_else(|| {
            run.fail(Error::structural(
                &sheet.name,
                format!("no {} header row", detection.kind),
                vec![detection.kind.to_string()],
            ))
        })?;
    let layout = build_header_layout(&sheet, detection.kind, header_row);
    run.advance();

    // Mapping
    let mapping = mapper
        .map_sheet(&sheet.name, &layout.labels, detection.kind)
        .map_err(|e| run.fail(e))?;
    debug!(
        "Sheet '{}': mapped {} of {} columns",
        sheet.name,
        mapping.len(),
        layout.labels.len()
    );
    run.advance();

    // Transforming
    let mut records = Vec::new();
    for row in sheet.rows.iter().skip(layout.data_start()) {
        match RowKind::classify(row) {
            RowKind::Blank => stats.blank_rows += 1,
            RowKind::Metadata => stats.metadata_rows += 1,
            RowKind::Data => {
                let transformed = transform_row(row, &mapping, detection.kind);
                stats.record_failures(&transformed.failures);
                records.push(transformed.record);
            }
        }
    }
    stats.records_in = records.len();
    run.advance();

    Ok(PreparedSheet {
        format: detection.kind,
        records,
        stats,
        run,
    })
}

/// Runs the per-sheet pipeline
#[derive(Debug, Clone)]
pub struct SheetProcessor {
    detector: FormatDetector,
    mapper: ColumnMapper,
    resolver: GeocodingResolver,
    geocode_concurrency: usize,
}

impl SheetProcessor {
    pub fn new(config: &Config, resolver: GeocodingResolver) -> Self {
        Self {
            detector: FormatDetector::new(&config.detection),
            mapper: ColumnMapper::new(&config.mapping),
            resolver,
            geocode_concurrency: config.geocoding.concurrency.max(1),
        }
    }

    pub fn detector(&self) -> &FormatDetector {
        &self.detector
    }

    pub fn mapper(&self) -> &ColumnMapper {
        &self.mapper
    }

    pub fn resolver(&self) -> &GeocodingResolver {
        &self.resolver
    }

    /// Same pipeline with a different resolver
    pub fn with_resolver(&self, resolver: GeocodingResolver) -> Self {
        Self {
            resolver,
            ..self.clone()
        }
    }

    /// Process one panel sheet
    ///
    /// Detection, mapping and row transformation run on the blocking pool, so
    /// a timeout around this future can fire while a large sheet is still
    /// being transformed.
    pub async fn process(
        &self,
        sheet: &RawSheet,
        terminations: &TerminationSet,
    ) -> Result<SheetOutput> {
        let start_time = Instant::now();
        let detector = self.detector.clone();
        let mapper = self.mapper.clone();
        let raw = sheet.clone();
        let PreparedSheet {
            format,
            records,
            mut stats,
            mut run,
        } = tokio::task::spawn_blocking(move || prepare_sheet(&detector, &mapper, &raw))
            .await
            .map_err(|e| {
                Error::processing_interrupted(format!(
                    "Sheet '{}' transform task failed: {}",
                    sheet.name, e
                ))
            })??;

        // Geocoding
        let records = self.geocode(records, &mut stats).await;
        run.advance();

        // Filtering
        let (records, removed) = terminations.filter(records);
        stats.terminated_filtered = removed;
        stats.records_out = records.len();
        run.advance();

        let partitions = partition_by_country(records);
        info!(
            "Sheet '{}' ({}): {} records, {} terminated, {} metadata rows, geocoded {} in {:.2?}",
            sheet.name,
            format,
            stats.records_out,
            stats.terminated_filtered,
            stats.metadata_rows,
            stats.geocode.success_rate_display(),
            start_time.elapsed()
        );

        Ok(SheetOutput {
            sheet_name: sheet.name.clone(),
            format,
            partitions,
            stats,
        })
    }

    /// Resolve coordinates with a bounded in-flight window, keeping order
    ///
    /// Index hits complete without suspending, so the loop yields to the
    /// runtime every [`GEOCODE_YIELD_INTERVAL`] records.
    async fn geocode(
        &self,
        records: Vec<NormalizedRecord>,
        stats: &mut SheetStats,
    ) -> Vec<NormalizedRecord> {
        let resolver = &self.resolver;
        let mut resolved = stream::iter(records)
            .map(|mut record| async move {
                let result = resolver
                    .resolve(&record.postal_code, &record.full_address(), record.country)
                    .await;
                record.apply_geocode(&result);
                (record, result)
            })
            .buffered(self.geocode_concurrency);

        let mut records = Vec::new();
        while let Some((record, result)) = resolved.next().await {
            stats.geocode.record(&result);
            records.push(record);
            if records.len() % GEOCODE_YIELD_INTERVAL == 0 {
                tokio::task::yield_now().await;
            }
        }
        records
    }
}

/// Split records by country, Singapore first, dropping empty partitions
pub fn partition_by_country(records: Vec<NormalizedRecord>) -> Vec<CountryPartition> {
    let (singapore, malaysia): (Vec<_>, Vec<_>) = records
        .into_iter()
        .partition(|r| r.country == Country::Singapore);

    [
        (Country::Singapore, singapore),
        (Country::Malaysia, malaysia),
    ]
    .into_iter()
    .filter(|(_, records)| !records.is_empty())
    .map(|(country, records)| CountryPartition { country, records })
    .collect()
}
