//! Header rows and compound sub-headers

use crate::app::models::{FormatKind, RawSheet};
use crate::app::services::format_detector::normalize_label;

/// Sub-header cells that mark a slot row under merged day groups
const SLOT_LABELS: &[&str] = &["am", "pm", "night"];

/// Resolved header of a sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLayout {
    pub header_row: usize,
    pub sub_header_row: Option<usize>,
    /// One label per column; compound labels look like `MON - FRI.AM`
    pub labels: Vec<String>,
}

impl HeaderLayout {
    /// First row after the header block
    pub fn data_start(&self) -> usize {
        self.sub_header_row.unwrap_or(self.header_row) + 1
    }
}

/// Build the header labels for a sheet whose header row is known
///
/// Merged multi-level sheets may carry a second row of AM/PM/NIGHT labels
/// under merged day-group headers; when that row holds at least two slot
/// labels the pair is folded into compound `group.sub` keys.
pub fn build_header_layout(sheet: &RawSheet, kind: FormatKind, header_row: usize) -> HeaderLayout {
    let width = sheet.width();
    let header = sheet.row(header_row);

    let sub_row = header_row + 1;
    let sub_header = (kind == FormatKind::MergedMultiLevel && is_slot_row(sheet.row(sub_row)))
        .then_some(sub_row);

    let labels = (0..width)
        .map(|col| {
            let top = header.get(col).map(|s| s.trim()).unwrap_or("");
            match sub_header {
                Some(row) => compound_label(top, sheet.cell(row, col)),
                None => top.to_string(),
            }
        })
        .collect();

    HeaderLayout {
        header_row,
        sub_header_row: sub_header,
        labels,
    }
}

fn is_slot_row(row: &[String]) -> bool {
    row.iter()
        .filter(|c| SLOT_LABELS.contains(&normalize_label(c).as_str()))
        .count()
        >= 2
}

fn compound_label(top: &str, sub: &str) -> String {
    let sub = sub.trim();
    if sub.is_empty() || sub.eq_ignore_ascii_case(top) {
        top.to_string()
    } else if top.is_empty() {
        sub.to_string()
    } else {
        format!("{}.{}", top, sub)
    }
}
