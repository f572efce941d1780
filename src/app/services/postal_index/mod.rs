//! Postal code index for O(1) coordinate lookups
//!
//! Loads a postal-code master file (PostalCode, Latitude, Longitude) once at
//! startup and serves read-only lookups to every worker. The index is
//! immutable after load and shared behind an `Arc`.

use crate::app::models::Coordinates;
use crate::constants::POSTAL_CODE_LENGTH;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub mod loader;
pub mod metadata;

#[cfg(test)]
pub mod tests;

pub use metadata::LoadStats;

/// Postal code index keyed by six-digit postal code
#[derive(Debug, Clone)]
pub struct PostalCodeIndex {
    /// Coordinates indexed by normalized postal code
    pub(crate) entries: HashMap<String, Coordinates>,

    /// File the index was loaded from, if any
    pub(crate) source: Option<PathBuf>,

    /// Timestamp when the index was loaded
    pub(crate) load_time: Instant,
}

impl Default for PostalCodeIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PostalCodeIndex {
    /// Create an empty index; every lookup misses
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            source: None,
            load_time: Instant::now(),
        }
    }

    /// Build an index from in-memory entries, normalizing each code
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Coordinates)>,
        S: AsRef<str>,
    {
        let mut index = Self::new();
        for (code, coordinates) in entries {
            if let Some(key) = normalize_postal_key(code.as_ref()) {
                index.entries.insert(key, coordinates);
            }
        }
        index
    }

    /// Coordinates for a postal code (O(1) lookup)
    pub fn lookup(&self, postal_code: &str) -> Option<Coordinates> {
        normalize_postal_key(postal_code).and_then(|key| self.entries.get(&key).copied())
    }

    pub fn contains(&self, postal_code: &str) -> bool {
        self.lookup(postal_code).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn load_time(&self) -> Instant {
        self.load_time
    }
}

/// Digits of a postal code, left-padded with zeros to six
///
/// Returns `None` for values with no digits or more than six digits.
pub fn normalize_postal_key(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() || digits.len() > POSTAL_CODE_LENGTH {
        None
    } else {
        Some(format!("{:0>width$}", digits, width = POSTAL_CODE_LENGTH))
    }
}
