//! Tests for postal index loading

use super::*;
use crate::app::services::postal_index::PostalCodeIndex;
use tempfile::TempDir;

#[test]
fn test_load_file_skips_invalid_rows() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_postal_master(temp_dir.path(), "postal_code_master.csv");

    let (index, stats) = PostalCodeIndex::load_file(&path).unwrap();
    assert_eq!(index.len(), 2);
    assert_eq!(stats.records_loaded, 2);
    assert_eq!(stats.records_skipped, 2);
    assert!(index.contains("018956"));
    assert_eq!(index.source(), Some(path.as_path()));
}

#[test]
fn test_load_uses_first_existing_candidate() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing.xlsx");
    let present = create_postal_master(temp_dir.path(), "master.csv");

    let config = index_config(vec![missing, present.clone()], 50);
    let (index, stats) = PostalCodeIndex::load(&config);

    assert_eq!(index.len(), 2);
    assert_eq!(stats.files_attempted, 2);
    assert_eq!(stats.source, Some(present));
}

#[test]
fn test_load_skips_oversized_candidate() {
    let temp_dir = TempDir::new().unwrap();
    let path = create_postal_master(temp_dir.path(), "master.csv");

    // A zero megabyte ceiling rejects any non-empty file
    let config = index_config(vec![path], 0);
    let (index, stats) = PostalCodeIndex::load(&config);

    assert!(index.is_empty());
    assert!(stats.has_errors());
    assert!(stats.source.is_none());
}

#[test]
fn test_load_without_candidates_is_empty() {
    let (index, stats) = PostalCodeIndex::load(&index_config(Vec::new(), 50));
    assert!(index.is_empty());
    assert_eq!(stats.files_attempted, 0);
    assert!(stats.summary().contains("No postal index"));
}

#[test]
fn test_load_file_without_required_columns_fails() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("bad.csv");
    std::fs::write(&path, "Code,Name\n1,2\n").unwrap();

    assert!(PostalCodeIndex::load_file(&path).is_err());
}
