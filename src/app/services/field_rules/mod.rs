//! Per-field derivation rules for normalized records
//!
//! Every rule is a pure function over already-mapped raw cell values and
//! returns a [`FieldOutcome`] instead of failing. A rule that cannot produce a
//! value yields an empty/default value with `ok == false` and a reason; the
//! sheet processor aggregates those into per-field failure counters.
//!
//! # Modules
//!
//! - [`code`] - Clinic code normalization (termination join key)
//! - [`phone`] - Telephone and remarks consolidation
//! - [`hours`] - Operating-hours consolidation (slot and free-text layouts)
//! - [`address`] - Address line construction per layout
//! - [`postal`] - Postal code extraction and validation
//! - [`country`] - Country inference from address text

pub mod address;
pub mod code;
pub mod country;
pub mod hours;
pub mod phone;
pub mod postal;

#[cfg(test)]
pub mod tests;

pub use address::{AddressLines, AddressParts, build_address};
pub use code::normalize_code;
pub use country::infer_country;
pub use hours::{combine_slots, extract_free_text_hours, simple_hours};
pub use phone::combine_phone_remarks;
pub use postal::{derive_postal_code, extract_postal_code, normalize_postal_column};

/// Result of one derivation rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub value: String,
    pub ok: bool,
    pub reason: Option<String>,
}

impl FieldOutcome {
    pub fn ok(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ok: true,
            reason: None,
        }
    }

    /// A failed derivation still carries the best-effort value
    pub fn failed(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ok: false,
            reason: Some(reason.into()),
        }
    }

    pub fn into_value(self) -> String {
        self.value
    }
}

/// Collapse internal whitespace runs to single spaces and trim
pub fn clean_text(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
