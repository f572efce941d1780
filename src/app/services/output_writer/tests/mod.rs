//! Tests for output writing

use crate::app::models::{Country, FormatKind, NormalizedRecord};
use crate::app::services::sheet_processor::{CountryPartition, SheetOutput, SheetStats};

pub mod writer_tests;

pub fn sample_record(code: &str, country: Country) -> NormalizedRecord {
    NormalizedRecord {
        code: code.to_string(),
        name: format!("{} Clinic", code),
        address1: "1 Sample Road".to_string(),
        postal_code: if country == Country::Singapore {
            "238823".to_string()
        } else {
            String::new()
        },
        country,
        mon_to_fri: "8am-12pm/CLOSED/CLOSED".to_string(),
        latitude: (country == Country::Singapore).then_some(1.3048),
        longitude: (country == Country::Singapore).then_some(103.8318),
        ..Default::default()
    }
}

pub fn sheet_output(name: &str, partitions: Vec<(Country, Vec<NormalizedRecord>)>) -> SheetOutput {
    SheetOutput {
        sheet_name: name.to_string(),
        format: FormatKind::Standard,
        partitions: partitions
            .into_iter()
            .map(|(country, records)| CountryPartition { country, records })
            .collect(),
        stats: SheetStats::default(),
    }
}
