//! Shared helpers for column mapping tests

use crate::app::models::{FormatKind, RawSheet};
use crate::app::services::column_mapper::{HeaderLayout, build_header_layout};
use crate::app::services::format_detector::{FormatDetector, unmerge};

pub mod header_tests;

pub fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Unmerge, detect and build the header layout of a fixture sheet
pub fn layout_of(sheet: &RawSheet) -> (FormatKind, HeaderLayout) {
    let sheet = unmerge(sheet);
    let detection = FormatDetector::default().detect(&sheet).unwrap();
    (
        detection.kind,
        build_header_layout(&sheet, detection.kind, detection.header_row),
    )
}
