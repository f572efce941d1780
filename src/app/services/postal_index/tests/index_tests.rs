//! Tests for postal index lookups

use crate::app::models::Coordinates;
use crate::app::services::postal_index::{PostalCodeIndex, normalize_postal_key};

#[test]
fn test_normalize_postal_key() {
    assert_eq!(normalize_postal_key("238823").as_deref(), Some("238823"));
    assert_eq!(normalize_postal_key("18956").as_deref(), Some("018956"));
    assert_eq!(normalize_postal_key("S 018956").as_deref(), Some("018956"));
    assert_eq!(normalize_postal_key(""), None);
    assert_eq!(normalize_postal_key("1234567"), None);
}

#[test]
fn test_lookup_hits_and_misses() {
    let index = PostalCodeIndex::from_entries([
        ("238823", Coordinates::new(1.3048, 103.8318)),
        ("18956", Coordinates::new(1.2789, 103.8536)),
    ]);

    assert_eq!(index.len(), 2);
    assert_eq!(
        index.lookup("238823"),
        Some(Coordinates::new(1.3048, 103.8318))
    );
    // Stored zero-padded, found either way
    assert!(index.contains("018956"));
    assert!(index.contains("18956"));
    assert!(index.lookup("999999").is_none());
    assert!(index.lookup("").is_none());
}

#[test]
fn test_empty_index() {
    let index = PostalCodeIndex::new();
    assert!(index.is_empty());
    assert!(index.source().is_none());
    assert!(index.lookup("238823").is_none());
}
