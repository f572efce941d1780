//! Geocode result cache
//!
//! Shared by every worker of a batch (or of the whole process, depending on
//! the configured scope). Two workers resolving the same key concurrently
//! may both populate it; the last write wins.

use crate::app::models::Coordinates;
use crate::app::services::postal_index::normalize_postal_key;
use std::collections::HashMap;
use std::sync::RwLock;

/// Cached external answers; `None` records a definitive "not found"
#[derive(Debug, Default)]
pub struct GeocodeCache {
    entries: RwLock<HashMap<String, Option<Coordinates>>>,
}

impl GeocodeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached answer for a key, if one exists
    pub fn get(&self, key: &str) -> Option<Option<Coordinates>> {
        let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
        entries.get(key).copied()
    }

    pub fn insert(&self, key: impl Into<String>, value: Option<Coordinates>) {
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .clear();
    }
}

/// Cache key: the normalized postal code, else the normalized address
pub fn cache_key(postal_code: &str, address: &str) -> Option<String> {
    if let Some(postal) = normalize_postal_key(postal_code) {
        return Some(format!("postal:{}", postal));
    }

    let address = address.split_whitespace().collect::<Vec<_>>().join(" ");
    if address.is_empty() {
        None
    } else {
        Some(format!("address:{}", address.to_uppercase()))
    }
}
