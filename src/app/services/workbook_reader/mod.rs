//! Workbook reading and sheet classification
//!
//! Turns an input file into [`RawSheet`] cell matrices. Excel and OpenDocument
//! workbooks are read with calamine (including merged-cell regions where the
//! format records them); CSV files become a single sheet named after the file
//! stem.
//!
//! # Modules
//!
//! - [`excel`] - calamine-backed readers for xlsx/xls/ods
//! - [`delimited`] - CSV reader
//! - [`classify`] - Panel/termination sheet classification and file naming

pub mod classify;
pub mod delimited;
pub mod excel;

#[cfg(test)]
pub mod tests;

pub use classify::{SheetClassification, classify_sheets, sanitize_sheet_name};

use crate::app::models::RawSheet;
use crate::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// A sheet that exists in the workbook but could not be read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnreadableSheet {
    pub name: String,
    pub reason: String,
}

/// All sheets of one input file
#[derive(Debug, Clone, Default)]
pub struct Workbook {
    pub source: PathBuf,
    pub sheets: Vec<RawSheet>,
    pub unreadable: Vec<UnreadableSheet>,
}

impl Workbook {
    pub fn sheet(&self, name: &str) -> Option<&RawSheet> {
        self.sheets.iter().find(|sheet| sheet.name == name)
    }

    /// Names of every sheet, readable or not, in workbook order
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets
            .iter()
            .map(|sheet| sheet.name.clone())
            .chain(self.unreadable.iter().map(|sheet| sheet.name.clone()))
            .collect()
    }
}

/// Lowercase extension of a path, if any
pub fn file_extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
}

/// Whether the path has an extension the reader understands
pub fn is_supported_file(path: &Path) -> bool {
    file_extension(path)
        .map(|ext| crate::constants::SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
        .unwrap_or(false)
}

/// Read every sheet of a workbook
///
/// Blocking; callers on the async runtime run this on a blocking thread.
pub fn read_workbook(path: &Path) -> Result<Workbook> {
    let path_label = path.display().to_string();
    let extension = file_extension(path).unwrap_or_default();

    let workbook = match extension.as_str() {
        "xlsx" | "xlsm" => excel::read_xlsx(path)?,
        "xls" => excel::read_xls(path)?,
        "ods" => excel::read_ods(path)?,
        "csv" => Workbook {
            source: path.to_path_buf(),
            sheets: vec![delimited::read_csv(path)?],
            unreadable: Vec::new(),
        },
        _ => {
            return Err(Error::input(
                path_label,
                format!("unsupported file type '.{}'", extension),
            ));
        }
    };

    for sheet in &workbook.unreadable {
        warn!(
            "Sheet '{}' in {} could not be read: {}",
            sheet.name, path_label, sheet.reason
        );
    }
    debug!(
        "Read {} sheets from {} ({} unreadable)",
        workbook.sheets.len(),
        path_label,
        workbook.unreadable.len()
    );

    Ok(workbook)
}
