//! Shared test utilities for workbook reader tests

use std::fs;
use std::path::{Path, PathBuf};


/// Write a CSV fixture and return its path
pub fn write_csv(dir: &Path, filename: &str, content: &str) -> PathBuf {
    let path = dir.join(filename);
    fs::write(&path, content).unwrap();
    path
}
