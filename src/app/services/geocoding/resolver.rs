//! Geocode resolution pipeline

use super::cache::{GeocodeCache, cache_key};
use super::client::{GeocodeQuery, GeocodingClient, GoogleGeocodingClient};
use crate::Result;
use crate::app::models::{Country, GeocodeResult};
use crate::app::services::postal_index::PostalCodeIndex;
use crate::config::Config;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Resolves records to coordinates; cheap to clone and share across tasks
#[derive(Clone)]
pub struct GeocodingResolver {
    index: Arc<PostalCodeIndex>,
    client: Option<Arc<dyn GeocodingClient>>,
    cache: Arc<GeocodeCache>,
    request_timeout: Duration,
}

impl std::fmt::Debug for GeocodingResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeocodingResolver")
            .field("index_size", &self.index.len())
            .field("external_client", &self.client.is_some())
            .field("cached", &self.cache.len())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GeocodingResolver {
    pub fn new(
        index: Arc<PostalCodeIndex>,
        client: Option<Arc<dyn GeocodingClient>>,
        cache: Arc<GeocodeCache>,
        request_timeout: Duration,
    ) -> Self {
        Self {
            index,
            client,
            cache,
            request_timeout,
        }
    }

    /// Load the postal index and set up the external client named by the configuration
    ///
    /// A missing or unreadable index leaves an empty one; only an unusable
    /// client configuration is an error.
    pub fn from_config(config: &Config) -> Result<Self> {
        let (index, load_stats) = PostalCodeIndex::load(&config.postal_index);
        if index.is_empty() {
            warn!("Postal code index is empty; {}", load_stats.summary());
        } else {
            info!("Postal code index ready: {}", load_stats.summary());
        }

        let client = GoogleGeocodingClient::from_config(&config.geocoding)?
            .map(|client| Arc::new(client) as Arc<dyn GeocodingClient>);
        if client.is_none() {
            info!("No geocoding API key configured; using the postal index only");
        }

        Ok(Self::new(
            Arc::new(index),
            client,
            Arc::new(GeocodeCache::new()),
            config.geocoding.request_timeout(),
        ))
    }

    /// Resolver that only consults the postal index
    pub fn index_only(index: Arc<PostalCodeIndex>) -> Self {
        Self::new(index, None, Arc::new(GeocodeCache::new()), Duration::ZERO)
    }

    /// Same index and client with a different cache
    pub fn with_cache(&self, cache: Arc<GeocodeCache>) -> Self {
        Self {
            cache,
            ..self.clone()
        }
    }

    pub fn cache(&self) -> &Arc<GeocodeCache> {
        &self.cache
    }

    pub fn has_external_client(&self) -> bool {
        self.client.is_some()
    }

    /// Resolve one record's location; never fails
    pub async fn resolve(&self, postal_code: &str, address: &str, country: Country) -> GeocodeResult {
        if let Some(coordinates) = self.index.lookup(postal_code) {
            return GeocodeResult::postal_lookup(coordinates);
        }

        let Some(client) = &self.client else {
            return GeocodeResult::none();
        };
        let Some(key) = cache_key(postal_code, address) else {
            return GeocodeResult::none();
        };

        if let Some(cached) = self.cache.get(&key) {
            return cached.map(GeocodeResult::api).unwrap_or_else(GeocodeResult::none);
        }

        let query = GeocodeQuery::new(postal_code, address, country);
        match tokio::time::timeout(self.request_timeout, client.geocode(&query)).await {
            Ok(Ok(found)) => {
                self.cache.insert(key, found);
                found.map(GeocodeResult::api).unwrap_or_else(GeocodeResult::none)
            }
            Ok(Err(e)) => {
                warn!("Geocoding degraded for '{}': {}", key, e);
                GeocodeResult::none()
            }
            Err(_) => {
                debug!(
                    "Geocoding request for '{}' exceeded {:?}",
                    key, self.request_timeout
                );
                GeocodeResult::none()
            }
        }
    }
}
