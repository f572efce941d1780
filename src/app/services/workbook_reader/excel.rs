//! calamine-backed workbook readers

use super::{UnreadableSheet, Workbook};
use crate::app::models::{MergedRange, RawSheet};
use crate::{Error, Result};
use calamine::{Data, Dimensions, Ods, Range, Reader, Xls, Xlsx, open_workbook};
use std::path::Path;
use tracing::warn;

/// Render a cell as trimmed text
///
/// Integral floats lose their fractional part so numeric codes and postal
/// codes read back the way they were typed.
pub fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty | Data::Error(_) => String::new(),
        Data::String(value) => value.trim().to_string(),
        Data::Int(value) => value.to_string(),
        Data::Float(value) if value.fract() == 0.0 && value.abs() < 1e15 => {
            format!("{}", *value as i64)
        }
        Data::Float(value) => value.to_string(),
        Data::Bool(value) => value.to_string(),
        other => other.to_string().trim().to_string(),
    }
}

/// Convert a range into a matrix indexed by absolute sheet position
pub fn range_to_rows(range: &Range<Data>) -> Vec<Vec<String>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<String>> = vec![Vec::new(); start_row as usize];
    for row in range.rows() {
        let mut cells = vec![String::new(); start_col as usize];
        cells.extend(row.iter().map(cell_text));
        while cells.last().is_some_and(|cell| cell.is_empty()) {
            cells.pop();
        }
        rows.push(cells);
    }
    rows
}

fn merged_range(dimensions: &Dimensions) -> MergedRange {
    MergedRange::new(
        dimensions.start.0 as usize,
        dimensions.start.1 as usize,
        dimensions.end.0 as usize,
        dimensions.end.1 as usize,
    )
}

fn workbook_error(path: &Path, error: impl std::fmt::Display) -> Error {
    Error::workbook(path.display().to_string(), error.to_string())
}

/// Read an xlsx/xlsm workbook including merged regions
pub fn read_xlsx(path: &Path) -> Result<Workbook> {
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|e| workbook_error(path, e))?;
    let merges_loaded = match workbook.load_merged_regions() {
        Ok(()) => true,
        Err(e) => {
            warn!(
                "Merged regions unavailable for {}: {}",
                path.display(),
                e
            );
            false
        }
    };

    let mut result = Workbook {
        source: path.to_path_buf(),
        ..Default::default()
    };

    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let merged = if merges_loaded {
                    workbook
                        .merged_regions_by_sheet(&name)
                        .into_iter()
                        .map(|(_, _, dimensions)| merged_range(dimensions))
                        .collect()
                } else {
                    Vec::new()
                };
                result
                    .sheets
                    .push(RawSheet::new(name, range_to_rows(&range)).with_merged(merged));
            }
            Err(e) => result.unreadable.push(UnreadableSheet {
                name,
                reason: e.to_string(),
            }),
        }
    }

    Ok(result)
}

/// Read a legacy xls workbook including merged cells
pub fn read_xls(path: &Path) -> Result<Workbook> {
    let mut workbook: Xls<_> = open_workbook(path).map_err(|e| workbook_error(path, e))?;

    let mut result = Workbook {
        source: path.to_path_buf(),
        ..Default::default()
    };

    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let merged = workbook
                    .worksheet_merge_cells(&name)
                    .unwrap_or_default()
                    .iter()
                    .map(merged_range)
                    .collect();
                result
                    .sheets
                    .push(RawSheet::new(name, range_to_rows(&range)).with_merged(merged));
            }
            Err(e) => result.unreadable.push(UnreadableSheet {
                name,
                reason: e.to_string(),
            }),
        }
    }

    Ok(result)
}

/// Read an OpenDocument spreadsheet; merged cells are not exposed
pub fn read_ods(path: &Path) -> Result<Workbook> {
    let mut workbook: Ods<_> = open_workbook(path).map_err(|e| workbook_error(path, e))?;

    let mut result = Workbook {
        source: path.to_path_buf(),
        ..Default::default()
    };

    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => result
                .sheets
                .push(RawSheet::new(name, range_to_rows(&range))),
            Err(e) => result.unreadable.push(UnreadableSheet {
                name,
                reason: e.to_string(),
            }),
        }
    }

    Ok(result)
}
