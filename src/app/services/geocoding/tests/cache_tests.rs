//! Tests for the geocode cache and its keys

use crate::app::models::Coordinates;
use crate::app::services::geocoding::{GeocodeCache, cache_key};

#[test]
fn test_cache_key_prefers_postal_code() {
    assert_eq!(
        cache_key("18956", "1 Raffles Place").as_deref(),
        Some("postal:018956")
    );
    assert_eq!(
        cache_key("", "  1  raffles place ").as_deref(),
        Some("address:1 RAFFLES PLACE")
    );
    assert_eq!(cache_key("", "   "), None);
}

#[test]
fn test_cache_records_negative_answers() {
    let cache = GeocodeCache::new();
    assert!(cache.get("postal:238823").is_none());

    cache.insert("postal:238823", Some(Coordinates::new(1.3, 103.8)));
    cache.insert("address:NOWHERE", None);

    assert_eq!(cache.len(), 2);
    assert_eq!(
        cache.get("postal:238823"),
        Some(Some(Coordinates::new(1.3, 103.8)))
    );
    assert_eq!(cache.get("address:NOWHERE"), Some(None));

    cache.clear();
    assert!(cache.is_empty());
}
