//! Spreadsheet layout detection
//!
//! Panel sheets arrive in a handful of layouts. Each layout has a
//! [`Signature`]: header keywords, anchor keywords and whether it needs a
//! merged multi-level header. Signatures are tried most specific first and
//! the first one that matches a row near the top of the sheet wins.
//!
//! Sheets are expected to be unmerged (see [`unmerge`]) before detection so
//! a merged header label is visible in every column it spans.

pub mod signatures;
pub mod unmerge;

#[cfg(test)]
pub mod tests;

pub use signatures::{SIGNATURES, Signature, normalize_label};
pub use unmerge::unmerge;

use crate::app::models::{FormatKind, RawSheet};
use crate::config::DetectionConfig;
use crate::{Error, Result};
use tracing::debug;

/// Detected layout and the row holding its header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub kind: FormatKind,
    pub header_row: usize,
}

/// Matches sheets against the ordered signature list
#[derive(Debug, Clone)]
pub struct FormatDetector {
    scan_rows: usize,
    threshold: usize,
}

impl FormatDetector {
    pub fn new(config: &DetectionConfig) -> Self {
        Self {
            scan_rows: config.header_scan_rows,
            threshold: config.keyword_threshold,
        }
    }

    /// Rows scanned from the top of a sheet when looking for a header
    pub fn scan_rows(&self) -> usize {
        self.scan_rows
    }

    /// Identify the layout of an (unmerged) sheet
    pub fn detect(&self, sheet: &RawSheet) -> Result<Detection> {
        for signature in SIGNATURES {
            if let Some(header_row) = self.find_header(sheet, signature) {
                debug!(
                    "Sheet '{}' matches {} layout with header at row {}",
                    sheet.name, signature.kind, header_row
                );
                return Ok(Detection {
                    kind: signature.kind,
                    header_row,
                });
            }
        }

        Err(Error::structural(
            &sheet.name,
            format!(
                "no header row found in the first {} rows",
                self.scan_rows
            ),
            SIGNATURES.iter().map(|s| s.kind.to_string()).collect(),
        ))
    }

    /// Header row for a known layout, using that layout's keywords
    pub fn locate_header(&self, sheet: &RawSheet, kind: FormatKind) -> Option<usize> {
        Signature::for_kind(kind).and_then(|signature| self.find_header(sheet, signature))
    }

    fn find_header(&self, sheet: &RawSheet, signature: &Signature) -> Option<usize> {
        let scan = sheet.row_count().min(self.scan_rows);

        if signature.requires_merge
            && !sheet
                .merged
                .iter()
                .any(|m| m.is_multi_column() && m.start_row < scan)
        {
            return None;
        }

        (0..scan).find(|&row| signature.matches_row(sheet.row(row), self.threshold))
    }
}

impl Default for FormatDetector {
    fn default() -> Self {
        Self::new(&DetectionConfig::default())
    }
}
