//! Shared test utilities and fixtures for postal index tests

use crate::config::PostalIndexConfig;
use std::fs;
use std::path::{Path, PathBuf};

pub mod index_tests;
pub mod loader_tests;

/// Write a postal master CSV with a disclaimer line above the header
pub fn create_postal_master(dir: &Path, filename: &str) -> PathBuf {
    let path = dir.join(filename);
    let content = "\
Postal code master extract,,
PostalCode,Latitude,Longitude
238823,1.3048,103.8318
18956,1.2789,103.8536
560123,not-a-number,103.85
,1.0,103.0
";
    fs::write(&path, content).unwrap();
    path
}

/// Index config over the given candidates
pub fn index_config(paths: Vec<PathBuf>, max_file_size_mb: u64) -> PostalIndexConfig {
    PostalIndexConfig {
        paths,
        max_file_size_mb,
    }
}
