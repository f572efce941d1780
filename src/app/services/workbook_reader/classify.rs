//! Sheet classification and output naming

use crate::constants::{FILENAME_FORBIDDEN_CHARS, PANEL_SHEET_KEYWORDS, TERMINATION_SHEET_KEYWORDS};
use tracing::debug;

/// Sheets of a workbook grouped by role
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetClassification {
    pub panel: Vec<String>,
    pub termination: Vec<String>,
    pub ignored: Vec<String>,
}

/// Classify sheets by name
///
/// Termination keywords take precedence over panel keywords. When no sheet
/// name looks like a panel listing, every non-termination sheet is treated as
/// one so single-sheet exports with arbitrary names still get processed.
pub fn classify_sheets<S: AsRef<str>>(names: &[S]) -> SheetClassification {
    let mut classification = SheetClassification::default();

    for name in names {
        let name = name.as_ref();
        let lower = name.to_lowercase();
        if TERMINATION_SHEET_KEYWORDS.iter().any(|k| lower.contains(k)) {
            classification.termination.push(name.to_string());
        } else if PANEL_SHEET_KEYWORDS.iter().any(|k| lower.contains(k)) {
            classification.panel.push(name.to_string());
        } else {
            classification.ignored.push(name.to_string());
        }
    }

    if classification.panel.is_empty() && !classification.ignored.is_empty() {
        debug!(
            "No sheet name matched panel keywords; treating {} sheets as panels",
            classification.ignored.len()
        );
        classification.panel = std::mem::take(&mut classification.ignored);
    }

    classification
}

/// Make a sheet name safe for use in a file name
pub fn sanitize_sheet_name(name: &str) -> String {
    let stripped: String = name
        .chars()
        .filter(|c| !FILENAME_FORBIDDEN_CHARS.contains(c))
        .collect();
    let joined = stripped.split_whitespace().collect::<Vec<_>>().join("_");
    let trimmed = joined.trim_matches('_');
    if trimmed.is_empty() {
        "sheet".to_string()
    } else {
        trimmed.to_string()
    }
}
