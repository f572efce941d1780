//! Per-sheet processing statistics

use crate::app::services::geocoding::GeocodeStats;
use serde::Serialize;
use std::collections::BTreeMap;

/// Counters gathered while processing one sheet
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SheetStats {
    /// Data rows transformed into records
    pub records_in: usize,
    /// Records left after termination filtering
    pub records_out: usize,
    pub terminated_filtered: usize,
    /// Banner and disclaimer rows below the header
    pub metadata_rows: usize,
    pub blank_rows: usize,
    /// Output column to number of rows whose rule failed
    pub field_failures: BTreeMap<String, usize>,
    pub geocode: GeocodeStats,
}

impl SheetStats {
    pub fn record_failures(&mut self, columns: &[&str]) {
        for column in columns {
            *self.field_failures.entry(column.to_string()).or_default() += 1;
        }
    }

    pub fn total_field_failures(&self) -> usize {
        self.field_failures.values().sum()
    }
}
