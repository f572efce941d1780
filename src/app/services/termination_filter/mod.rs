//! Terminated clinic removal
//!
//! A [`TerminationSet`] is built once per workbook from its termination
//! sheets (plus any external termination lists) and applied to every panel
//! sheet. Matching is purely by value: normalized clinic code, or the
//! `(PostalCode, normalized Name)` composite when codes are unavailable.
//!
//! # Modules
//!
//! - [`extract`] - Reading termination entries from sheets and files

pub mod extract;

#[cfg(test)]
pub mod tests;

pub use extract::{load_termination_file, termination_entries_from_sheet};

use crate::app::models::NormalizedRecord;
use crate::app::services::field_rules::normalize_code;
use std::collections::HashSet;
use tracing::debug;

type Composite = (String, String);

/// Uppercase name with punctuation dropped and whitespace collapsed
pub fn normalize_name(raw: &str) -> String {
    raw.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

fn composite(postal_code: &str, name: &str) -> Option<Composite> {
    let postal_code = postal_code.trim();
    let name = normalize_name(name);
    (!postal_code.is_empty() && !name.is_empty()).then(|| (postal_code.to_string(), name))
}

/// Value-keyed set of terminated clinics
#[derive(Debug, Clone, Default)]
pub struct TerminationSet {
    codes: HashSet<String>,
    codeless_composites: HashSet<Composite>,
    composites: HashSet<Composite>,
    mismatches: usize,
}

impl TerminationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one termination entry
    ///
    /// Returns false (and counts a mismatch) when the entry has neither a
    /// code nor a usable postal code and name pair.
    pub fn insert(&mut self, code: &str, postal_code: &str, name: &str) -> bool {
        let code = normalize_code(code);
        let composite = composite(postal_code, name);

        if !code.ok && composite.is_none() {
            self.mismatches += 1;
            return false;
        }

        if code.ok {
            self.codes.insert(code.value);
        }
        if let Some(composite) = composite {
            if !code.ok {
                self.codeless_composites.insert(composite.clone());
            }
            self.composites.insert(composite);
        }
        true
    }

    /// Fold another set into this one
    pub fn extend(&mut self, other: TerminationSet) {
        self.codes.extend(other.codes);
        self.codeless_composites.extend(other.codeless_composites);
        self.composites.extend(other.composites);
        self.mismatches += other.mismatches;
    }

    /// Whether a record matches any termination entry
    pub fn is_terminated(&self, record: &NormalizedRecord) -> bool {
        let code = record.code.trim();
        if !code.is_empty() && self.codes.contains(code) {
            return true;
        }

        match composite(&record.postal_code, &record.name) {
            Some(key) if self.codeless_composites.contains(&key) => true,
            Some(key) if code.is_empty() => self.composites.contains(&key),
            _ => false,
        }
    }

    /// Split records into kept (order preserved) and the removed count
    pub fn filter(&self, records: Vec<NormalizedRecord>) -> (Vec<NormalizedRecord>, usize) {
        if self.is_empty() {
            return (records, 0);
        }

        let before = records.len();
        let kept: Vec<NormalizedRecord> = records
            .into_iter()
            .filter(|record| !self.is_terminated(record))
            .collect();
        let removed = before - kept.len();

        if removed > 0 {
            debug!("Filtered {} terminated clinics", removed);
        }
        (kept, removed)
    }

    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    pub fn composite_count(&self) -> usize {
        self.composites.len()
    }

    /// Entries skipped for lacking both keys
    pub fn mismatches(&self) -> usize {
        self.mismatches
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty() && self.composites.is_empty()
    }
}
