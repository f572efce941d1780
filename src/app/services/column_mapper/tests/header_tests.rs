//! Tests for header layouts

use super::layout_of;
use crate::app::models::{FormatKind, RawSheet};
use crate::app::services::column_mapper::build_header_layout;
use crate::app::services::format_detector::tests::{merged_multi_level_sheet, standard_sheet};

#[test]
fn test_merged_header_builds_compound_labels() {
    let (kind, layout) = layout_of(&merged_multi_level_sheet());

    assert_eq!(kind, FormatKind::MergedMultiLevel);
    assert_eq!(layout.sub_header_row, Some(1));
    assert_eq!(layout.data_start(), 2);
    assert_eq!(layout.labels[0], "ZONE");
    assert_eq!(layout.labels[3], "CLINIC NAME");
    assert_eq!(layout.labels[7], "MON - FRI.AM");
    assert_eq!(layout.labels[9], "MON - FRI.NIGHT");
    assert_eq!(layout.labels[17], "PUBLIC HOLIDAY.PM");
}

#[test]
fn test_single_level_header() {
    let (_, layout) = layout_of(&standard_sheet());

    assert_eq!(layout.header_row, 2);
    assert_eq!(layout.sub_header_row, None);
    assert_eq!(layout.data_start(), 3);
    assert_eq!(layout.labels[8], "Mon - Fri (AM)");
}

#[test]
fn test_sub_header_needs_two_slot_labels() {
    let sheet = RawSheet::from_rows(
        "Panel",
        vec![
            vec!["Zone", "Clinic Name", "Sat"],
            vec!["North", "Clinic A", "AM"],
        ],
    );
    let layout = build_header_layout(&sheet, FormatKind::MergedMultiLevel, 0);
    assert_eq!(layout.sub_header_row, None);
    assert_eq!(layout.labels, vec!["Zone", "Clinic Name", "Sat"]);
}
