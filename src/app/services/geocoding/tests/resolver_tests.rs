//! Tests for the geocode resolution order

use super::{MockClient, MockReply, resolver_with, sample_index};
use crate::app::models::{Coordinates, Country, GeocodeSource};
use crate::app::services::geocoding::GeocodingResolver;
use std::time::Duration;

const FOUND: Coordinates = Coordinates {
    latitude: 1.29,
    longitude: 103.85,
};

#[tokio::test]
async fn test_index_hit_skips_network() {
    let client = MockClient::new(MockReply::Found(FOUND));
    let resolver = resolver_with(client.clone(), Duration::from_secs(1));

    let result = resolver
        .resolve("238823", "391 Orchard Road", Country::Singapore)
        .await;

    assert_eq!(result.source, GeocodeSource::PostalLookup);
    assert_eq!(result.coordinates, Some(Coordinates::new(1.3048, 103.8318)));
    assert!(result.map_url.ends_with("1.3048,103.8318"));
    assert_eq!(client.calls(), 0);
}

#[tokio::test]
async fn test_api_answer_is_cached() {
    let client = MockClient::new(MockReply::Found(FOUND));
    let resolver = resolver_with(client.clone(), Duration::from_secs(1));

    let first = resolver
        .resolve("", "10 Anson Road", Country::Singapore)
        .await;
    let second = resolver
        .resolve("", "10  anson road", Country::Singapore)
        .await;

    assert_eq!(first.source, GeocodeSource::Api);
    assert_eq!(second, first);
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_not_found_is_cached() {
    let client = MockClient::new(MockReply::NotFound);
    let resolver = resolver_with(client.clone(), Duration::from_secs(1));

    for _ in 0..3 {
        let result = resolver.resolve("999999", "", Country::Singapore).await;
        assert_eq!(result.source, GeocodeSource::None);
        assert!(result.map_url.is_empty());
    }
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_service_failure_degrades_and_is_not_cached() {
    let client = MockClient::new(MockReply::Fail);
    let resolver = resolver_with(client.clone(), Duration::from_secs(1));

    let result = resolver
        .resolve("", "Jalan Ampang, Kuala Lumpur", Country::Malaysia)
        .await;
    assert!(!result.is_success());
    assert!(resolver.cache().is_empty());

    resolver
        .resolve("", "Jalan Ampang, Kuala Lumpur", Country::Malaysia)
        .await;
    assert_eq!(client.calls(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_slow_service_times_out() {
    let client = MockClient::new(MockReply::Hang);
    let resolver = resolver_with(client.clone(), Duration::from_millis(50));

    let result = resolver.resolve("", "1 Slow Street", Country::Singapore).await;

    assert_eq!(result.source, GeocodeSource::None);
    assert!(resolver.cache().is_empty());
    assert_eq!(client.calls(), 1);
}

#[tokio::test]
async fn test_without_client_only_index_is_used() {
    let resolver = GeocodingResolver::index_only(sample_index());
    assert!(!resolver.has_external_client());

    let hit = resolver.resolve("238823", "", Country::Singapore).await;
    let miss = resolver.resolve("", "10 Anson Road", Country::Singapore).await;

    assert!(hit.is_success());
    assert_eq!(miss.source, GeocodeSource::None);
}
