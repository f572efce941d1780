//! Shared fixtures for sheet processor tests

use crate::app::models::{Coordinates, RawSheet};
use crate::app::services::geocoding::GeocodingResolver;
use crate::app::services::postal_index::PostalCodeIndex;
use crate::app::services::sheet_processor::SheetProcessor;
use crate::config::Config;
use std::sync::Arc;

pub mod pipeline_tests;

/// Processor whose postal index holds the given entries and no external client
pub fn processor_with_index(entries: &[(&str, f64, f64)]) -> SheetProcessor {
    let index = PostalCodeIndex::from_entries(
        entries
            .iter()
            .map(|(postal, lat, lng)| (*postal, Coordinates::new(*lat, *lng))),
    );
    SheetProcessor::new(
        &Config::default(),
        GeocodingResolver::index_only(Arc::new(index)),
    )
}

/// Merged two-level sheet with banner rows and a Malaysian clinic
pub fn mixed_country_sheet() -> RawSheet {
    let mut sheet = crate::app::services::format_detector::tests::merged_multi_level_sheet();
    let width = sheet.width();
    let banner = |text: &str| {
        let mut row = vec![String::new(); width];
        row[0] = text.to_string();
        row
    };

    sheet.rows.insert(2, banner("24 Hours Clinic"));
    sheet.rows.push(vec![String::new(); width]);
    let mut malaysian: Vec<String> = vec![
        "JOHOR",
        "JOHOR BAHRU",
        "JB07",
        "Klinik Bayu",
        "12 Jalan Tebrau, Johor Bahru",
        "80300",
        "+607 333 4444",
        "24 HRS",
    ]
    .into_iter()
    .map(String::from)
    .collect();
    malaysian.resize(width, String::new());
    sheet.rows.push(malaysian);
    sheet.rows.push(banner("Note: hours subject to change"));
    sheet
}
