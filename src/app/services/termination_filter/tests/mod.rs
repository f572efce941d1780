//! Shared fixtures for termination filter tests

use crate::app::models::{NormalizedRecord, RawSheet};


pub fn record(code: &str, name: &str, postal_code: &str) -> NormalizedRecord {
    NormalizedRecord {
        code: code.to_string(),
        name: name.to_string(),
        postal_code: postal_code.to_string(),
        ..Default::default()
    }
}

/// Termination sheet with one code-keyed and one composite-keyed entry
pub fn termination_sheet() -> RawSheet {
    RawSheet::from_rows(
        "Terminated Clinics",
        vec![
            vec!["List of terminated clinics", "", "", ""],
            vec!["No.", "Clinic ID", "Clinic Name", "Address"],
            vec!["1", "gp-001", "Woodlands Family Clinic", "Blk 888 Woodlands Drive 50 Singapore 730888"],
            vec!["2", "", "Bedok Medical Centre", "10 Bedok North Ave 1 Singapore 469662"],
            vec!["3", "", "Unknown Clinic", ""],
            vec!["", "", "", ""],
        ],
    )
}
