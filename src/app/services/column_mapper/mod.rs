//! Header location and column mapping
//!
//! Turns a detected header row into a [`ColumnMapping`] from
//! [`SourceField`] to sheet column. Matching runs in two passes over a
//! per-layout synonym table: exact (case-insensitive, whitespace-collapsed)
//! first for every field, then a fuzzy pass on the remaining columns. Each
//! column is assigned to at most one field.
//!
//! # Modules
//!
//! - [`header`] - Header row and compound sub-header handling
//! - [`matcher`] - Exact and fuzzy label matching
//! - [`synonyms`] - Default synonym tables and overrides

pub mod header;
pub mod matcher;
pub mod synonyms;

#[cfg(test)]
pub mod tests;

pub use header::{HeaderLayout, build_header_layout};
pub use matcher::ColumnMapper;
pub use synonyms::SynonymTable;

use crate::app::models::SourceField;
use crate::app::services::field_rules::AddressParts;
use std::collections::BTreeMap;

/// A sheet column backing a source field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceColumn {
    pub index: usize,
    /// Header key, possibly a synthetic compound such as `MON - FRI.AM`
    pub label: String,
}

/// Source field to column assignments for one sheet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    fields: BTreeMap<SourceField, SourceColumn>,
}

impl ColumnMapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, field: SourceField, column: SourceColumn) {
        self.fields.insert(field, column);
    }

    pub fn get(&self, field: SourceField) -> Option<&SourceColumn> {
        self.fields.get(&field)
    }

    pub fn contains(&self, field: SourceField) -> bool {
        self.fields.contains_key(&field)
    }

    pub fn index_of(&self, field: SourceField) -> Option<usize> {
        self.get(field).map(|c| c.index)
    }

    /// Cell value for a field in a data row; `None` when unmapped
    pub fn value<'a>(&self, row: &'a [String], field: SourceField) -> Option<&'a str> {
        self.index_of(field)
            .map(|i| row.get(i).map(|s| s.trim()).unwrap_or(""))
    }

    /// Cell value for a field, empty when unmapped
    pub fn text<'a>(&self, row: &'a [String], field: SourceField) -> &'a str {
        self.value(row, field).unwrap_or("")
    }

    /// Address cells of a data row
    pub fn address_parts<'a>(&self, row: &'a [String]) -> AddressParts<'a> {
        AddressParts {
            full: self.text(row, SourceField::Address),
            lines: [
                self.text(row, SourceField::Address1),
                self.text(row, SourceField::Address2),
                self.text(row, SourceField::Address3),
                self.text(row, SourceField::Address4),
            ],
            block: self.text(row, SourceField::AddressBlock),
            unit: self.text(row, SourceField::AddressUnit),
            road: self.text(row, SourceField::AddressRoad),
            building: self.text(row, SourceField::AddressBuilding),
        }
    }

    /// Required fields that are not mapped
    pub fn missing(&self, required: &[SourceField]) -> Vec<SourceField> {
        required
            .iter()
            .filter(|f| !self.contains(**f))
            .copied()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&SourceField, &SourceColumn)> {
        self.fields.iter()
    }
}
