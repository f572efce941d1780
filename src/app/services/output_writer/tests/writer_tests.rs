//! Tests for file naming, frame layout and writing

use super::{sample_record, sheet_output};
use crate::app::models::Country;
use crate::app::services::output_writer::{OutputWriter, records_to_dataframe};
use crate::config::OutputFormat;
use crate::constants::OUTPUT_COLUMNS;
use tempfile::TempDir;

#[test]
fn test_output_path_naming() {
    let writer = OutputWriter::new("/out", OutputFormat::Csv, "batch42");

    assert_eq!(
        writer.output_path("GP / Clinics?", None),
        std::path::PathBuf::from("/out/batch42_GP_Clinics.csv")
    );
    assert_eq!(
        writer.output_path("Panel", Some(Country::Malaysia)),
        std::path::PathBuf::from("/out/batch42_Panel_my.csv")
    );

    let parquet = OutputWriter::new("/out", OutputFormat::Parquet, "b");
    assert!(parquet.output_path("S", None).to_string_lossy().ends_with("b_S.parquet"));
}

#[test]
fn test_frame_has_canonical_columns() {
    let records = vec![
        sample_record("A1", Country::Singapore),
        sample_record("B2", Country::Malaysia),
    ];
    let frame = records_to_dataframe(&records).unwrap();

    let names: Vec<String> = frame
        .get_column_names()
        .iter()
        .map(|n| n.to_string())
        .collect();
    assert_eq!(names, OUTPUT_COLUMNS.to_vec());
    assert_eq!(frame.height(), 2);
    assert_eq!(frame.column("Latitude").unwrap().null_count(), 1);
}

#[tokio::test]
async fn test_write_single_partition_csv() {
    let dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(dir.path(), OutputFormat::Csv, "b1");
    let output = sheet_output(
        "GP Clinics",
        vec![(Country::Singapore, vec![sample_record("A1", Country::Singapore)])],
    );

    let files = writer.write_sheet(&output).await.unwrap();
    assert_eq!(files, vec![dir.path().join("b1_GP_Clinics.csv")]);

    let mut reader = csv::Reader::from_path(&files[0]).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, OUTPUT_COLUMNS.to_vec());

    let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
    assert_eq!(rows.len(), 1);
    assert_eq!(&rows[0][0], "A1");
    assert_eq!(&rows[0][9], "238823");
    assert_eq!(&rows[0][10], "SINGAPORE");
    assert_eq!(&rows[0][12], "8am-12pm/CLOSED/CLOSED");
}

#[tokio::test]
async fn test_write_split_partitions() {
    let dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(dir.path(), OutputFormat::Csv, "b2");
    let output = sheet_output(
        "Panel",
        vec![
            (Country::Singapore, vec![sample_record("A1", Country::Singapore)]),
            (Country::Malaysia, vec![sample_record("B2", Country::Malaysia)]),
        ],
    );

    let files = writer.write_sheet(&output).await.unwrap();
    assert_eq!(
        files,
        vec![
            dir.path().join("b2_Panel_sg.csv"),
            dir.path().join("b2_Panel_my.csv"),
        ]
    );
    assert!(files.iter().all(|f| f.exists()));
}

#[tokio::test]
async fn test_write_parquet() {
    let dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(dir.path(), OutputFormat::Parquet, "b3");
    let output = sheet_output(
        "SP",
        vec![(Country::Singapore, vec![sample_record("A1", Country::Singapore)])],
    );

    let files = writer.write_sheet(&output).await.unwrap();
    assert_eq!(files.len(), 1);
    assert!(std::fs::metadata(&files[0]).unwrap().len() > 0);
}

#[tokio::test]
async fn test_empty_sheet_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(dir.path(), OutputFormat::Csv, "b4");
    let files = writer.write_sheet(&sheet_output("Empty", vec![])).await.unwrap();
    assert!(files.is_empty());
}

#[tokio::test]
async fn test_missing_directory_is_an_error() {
    let dir = TempDir::new().unwrap();
    let writer = OutputWriter::new(dir.path().join("absent"), OutputFormat::Csv, "b5");
    let output = sheet_output(
        "GP",
        vec![(Country::Singapore, vec![sample_record("A1", Country::Singapore)])],
    );
    assert!(writer.write_sheet(&output).await.is_err());
}
