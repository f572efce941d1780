//! Shared test utilities and fixtures for geocoding tests

use crate::app::models::Coordinates;
use crate::app::services::geocoding::{GeocodeCache, GeocodeQuery, GeocodingClient, GeocodingResolver};
use crate::app::services::postal_index::PostalCodeIndex;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

pub mod cache_tests;
pub mod resolver_tests;

/// Scripted behaviour for the mock client
#[derive(Debug, Clone, Copy)]
pub enum MockReply {
    Found(Coordinates),
    NotFound,
    Fail,
    Hang,
}

/// Client that counts calls and answers from a script
#[derive(Debug)]
pub struct MockClient {
    reply: MockReply,
    calls: AtomicUsize,
}

impl MockClient {
    pub fn new(reply: MockReply) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl GeocodingClient for MockClient {
    async fn geocode(&self, _query: &GeocodeQuery) -> Result<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.reply {
            MockReply::Found(c) => Ok(Some(c)),
            MockReply::NotFound => Ok(None),
            MockReply::Fail => Err(Error::geocode_unavailable("quota exceeded")),
            MockReply::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(None)
            }
        }
    }
}

/// Index with a single Orchard Road entry
pub fn sample_index() -> Arc<PostalCodeIndex> {
    Arc::new(PostalCodeIndex::from_entries([(
        "238823",
        Coordinates::new(1.3048, 103.8318),
    )]))
}

/// Resolver over the sample index and the given client
pub fn resolver_with(client: Arc<MockClient>, timeout: Duration) -> GeocodingResolver {
    GeocodingResolver::new(
        sample_index(),
        Some(client as Arc<dyn GeocodingClient>),
        Arc::new(GeocodeCache::new()),
        timeout,
    )
}
