//! CSV reader producing a single raw sheet

use crate::app::models::RawSheet;
use crate::{Error, Result};
use csv::ReaderBuilder;
use std::path::Path;

/// Read a CSV file as one sheet named after the file stem
///
/// No header handling happens here; the header row is located later like
/// any other sheet.
pub fn read_csv(path: &Path) -> Result<RawSheet> {
    let file = path.display().to_string();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| Error::csv_parsing(&file, "Failed to open CSV file", Some(e)))?;

    let mut rows = Vec::new();
    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            Error::csv_parsing(&file, format!("Malformed record at line {}", line + 1), Some(e))
        })?;
        rows.push(record.iter().map(|cell| cell.trim().to_string()).collect());
    }

    let name = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("sheet")
        .to_string();

    Ok(RawSheet::new(name, rows))
}
