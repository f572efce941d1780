//! Address line construction
//!
//! Layouts publish addresses three ways: one full address column, numbered
//! address lines, or separate block/unit/road/building components. A full
//! address column wins when it holds a value; numbered lines come next and
//! components are the last resort.

use super::{FieldOutcome, clean_text};

/// Raw address cells of one row, empty where unmapped
#[derive(Debug, Clone, Copy, Default)]
pub struct AddressParts<'a> {
    pub full: &'a str,
    pub lines: [&'a str; 4],
    pub block: &'a str,
    pub unit: &'a str,
    pub road: &'a str,
    pub building: &'a str,
}

/// The three output address columns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressLines {
    pub address1: String,
    pub address2: String,
    pub address3: String,
}

impl AddressLines {
    /// All non-empty lines joined by single spaces
    pub fn joined(&self) -> String {
        join_non_empty([
            self.address1.as_str(),
            self.address2.as_str(),
            self.address3.as_str(),
        ])
    }
}

fn join_non_empty<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    parts
        .into_iter()
        .map(clean_text)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn with_prefix(value: &str, prefix: &str, separator: &str) -> String {
    let value = clean_text(value);
    if value.is_empty() || value.to_lowercase().starts_with(&prefix.to_lowercase()) {
        value
    } else {
        format!("{}{}{}", prefix, separator, value)
    }
}

/// Concatenate block, unit, road and building, skipping empty parts
pub fn component_address(parts: &AddressParts<'_>) -> String {
    let block = with_prefix(parts.block, "Blk", " ");
    let unit = with_prefix(parts.unit, "#", "");
    join_non_empty([
        block.as_str(),
        unit.as_str(),
        parts.road,
        parts.building,
    ])
}

/// Build the output address lines for one row
///
/// The returned outcome carries the single-line address used for postal code
/// extraction and country inference.
pub fn build_address(parts: &AddressParts<'_>) -> (AddressLines, FieldOutcome) {
    let full = clean_text(parts.full);
    let lines = if !full.is_empty() {
        AddressLines {
            address1: full,
            ..Default::default()
        }
    } else if parts.lines.iter().any(|line| !line.trim().is_empty()) {
        AddressLines {
            address1: clean_text(parts.lines[0]),
            address2: clean_text(parts.lines[1]),
            address3: join_non_empty([parts.lines[2], parts.lines[3]]),
        }
    } else {
        AddressLines {
            address1: component_address(parts),
            ..Default::default()
        }
    };

    let joined = lines.joined();
    let outcome = if joined.is_empty() {
        FieldOutcome::failed(joined, "address is empty")
    } else {
        FieldOutcome::ok(joined)
    };
    (lines, outcome)
}
