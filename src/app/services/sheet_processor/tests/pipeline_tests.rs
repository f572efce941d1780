//! Tests for the full sheet pipeline

use super::{mixed_country_sheet, processor_with_index};
use crate::Error;
use crate::app::models::{Country, FormatKind, RawSheet};
use crate::app::services::format_detector::tests::standard_sheet;
use crate::app::services::sheet_processor::partition_by_country;
use crate::app::services::termination_filter::TerminationSet;
use crate::app::services::termination_filter::tests::record;
use std::time::Duration;

#[tokio::test]
async fn test_standard_sheet_end_to_end() {
    let processor = processor_with_index(&[("730888", 1.4367, 103.7865)]);

    let output = processor
        .process(&standard_sheet(), &TerminationSet::new())
        .await
        .unwrap();

    assert_eq!(output.format, FormatKind::Standard);
    assert_eq!(output.partitions.len(), 1);
    assert_eq!(output.partitions[0].country, Country::Singapore);
    assert_eq!(output.record_count(), 2);

    let first = &output.partitions[0].records[0];
    assert_eq!(first.code, "GP001");
    assert_eq!(first.latitude, Some(1.4367));
    assert_eq!(first.google_map_url, "https://maps.google.com/?q=1.4367,103.7865");

    let second = &output.partitions[0].records[1];
    assert_eq!(second.latitude, None);
    assert_eq!(second.google_map_url, "");

    let stats = &output.stats;
    assert_eq!(stats.records_in, 2);
    assert_eq!(stats.records_out, 2);
    assert_eq!(stats.geocode.postal_code_matches, 1);
    assert_eq!(stats.geocode.failed_geocodes, 1);
    assert_eq!(stats.geocode.success_rate_display(), "50.0%");
    assert_eq!(stats.total_field_failures(), 0);
}

#[tokio::test]
async fn test_terminated_clinics_are_removed() {
    let processor = processor_with_index(&[]);
    let mut terminations = TerminationSet::new();
    terminations.insert("GP-001", "", "");

    let output = processor
        .process(&standard_sheet(), &terminations)
        .await
        .unwrap();

    assert_eq!(output.stats.records_in, 2);
    assert_eq!(output.stats.terminated_filtered, 1);
    assert_eq!(output.stats.records_out, 1);
    assert_eq!(output.partitions[0].records[0].code, "GP002");
}

#[tokio::test]
async fn test_banner_rows_excluded_and_countries_partitioned() {
    let processor = processor_with_index(&[]);

    let output = processor
        .process(&mixed_country_sheet(), &TerminationSet::new())
        .await
        .unwrap();

    assert_eq!(output.format, FormatKind::MergedMultiLevel);
    assert_eq!(output.stats.metadata_rows, 2);
    assert_eq!(output.stats.blank_rows, 1);
    assert_eq!(output.stats.records_in, 2);

    assert_eq!(output.partitions.len(), 2);
    let sg = &output.partitions[0];
    let my = &output.partitions[1];
    assert_eq!(sg.country, Country::Singapore);
    assert_eq!(sg.records[0].code, "TP01");
    assert_eq!(sg.records[0].postal_code, "520201");
    assert_eq!(sg.records[0].mon_to_fri, "8AM-12PM/2PM-5PM/6PM-9PM");
    assert_eq!(my.country, Country::Malaysia);
    assert_eq!(my.records[0].code, "JB07");
    assert_eq!(my.records[0].postal_code, "");
    assert!(output.partitions.iter().all(|p| !p.records.iter().any(|r| r.name.contains("24 Hours"))));
}

#[tokio::test]
async fn test_unrecognized_sheet_fails_structurally() {
    let processor = processor_with_index(&[]);
    let sheet = RawSheet::from_rows("Cover", vec![vec!["Welcome"], vec!["Contents"]]);

    let result = processor.process(&sheet, &TerminationSet::new()).await;
    assert!(matches!(result, Err(Error::Structural { .. })));
}

#[tokio::test]
async fn test_missing_name_column_fails_mapping() {
    let processor = processor_with_index(&[]);
    let sheet = RawSheet::from_rows(
        "GP",
        vec![
            vec!["S/N", "Region", "Clinic ID", "Tel"],
            vec!["1", "North", "GP1", "6123 4567"],
        ],
    );

    match processor.process(&sheet, &TerminationSet::new()).await {
        Err(Error::Mapping { missing, .. }) => assert_eq!(missing, vec!["name".to_string()]),
        other => panic!("Expected mapping error, got {:?}", other.map(|o| o.record_count())),
    }
}

#[test]
fn test_partition_drops_empty_sets() {
    let mut my = record("B", "KL Clinic", "");
    my.country = Country::Malaysia;

    let partitions = partition_by_country(vec![my]);
    assert_eq!(partitions.len(), 1);
    assert_eq!(partitions[0].country, Country::Malaysia);
    assert!(partition_by_country(Vec::new()).is_empty());
}

#[tokio::test]
async fn test_timeout_fires_while_large_sheet_is_transformed() {
    let processor = processor_with_index(&[("730888", 1.4367, 103.7865)]);
    let mut sheet = standard_sheet();
    let row = sheet.rows[3].clone();
    sheet.rows.extend(std::iter::repeat_n(row, 100_000));

    let outcome = tokio::time::timeout(
        Duration::from_millis(1),
        processor.process(&sheet, &TerminationSet::new()),
    )
    .await;

    assert!(outcome.is_err(), "transforming 100k rows finished inside 1ms");
}
