//! Per-sheet geocoding statistics

use crate::app::models::{GeocodeResult, GeocodeSource};
use serde::{Deserialize, Serialize};

/// Geocoding outcome counts for one sheet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeocodeStats {
    pub total_records: usize,
    pub successful_geocodes: usize,
    pub postal_code_matches: usize,
    pub address_geocodes: usize,
    pub failed_geocodes: usize,
}

impl GeocodeStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one resolution
    pub fn record(&mut self, result: &GeocodeResult) {
        self.total_records += 1;
        match result.source {
            GeocodeSource::PostalLookup => {
                self.successful_geocodes += 1;
                self.postal_code_matches += 1;
            }
            GeocodeSource::Api => {
                self.successful_geocodes += 1;
                self.address_geocodes += 1;
            }
            GeocodeSource::None => self.failed_geocodes += 1,
        }
    }

    /// Fold another sheet's counts into these
    pub fn merge(&mut self, other: &GeocodeStats) {
        self.total_records += other.total_records;
        self.successful_geocodes += other.successful_geocodes;
        self.postal_code_matches += other.postal_code_matches;
        self.address_geocodes += other.address_geocodes;
        self.failed_geocodes += other.failed_geocodes;
    }

    /// Success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        if self.total_records == 0 {
            0.0
        } else {
            (self.successful_geocodes as f64 / self.total_records as f64) * 100.0
        }
    }

    /// Success rate formatted like `95.0%`
    pub fn success_rate_display(&self) -> String {
        format!("{:.1}%", self.success_rate())
    }
}
