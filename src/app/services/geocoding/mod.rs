//! Geocoding with postal index lookup, external fallback and caching
//!
//! Resolution order for one record:
//! 1. Postal code index hit: coordinates from the index, no network
//! 2. Cached answer from an earlier external lookup
//! 3. One bounded request to the external geocoding service
//! 4. Nothing: empty coordinates and map URL
//!
//! External failures never escape the resolver; they degrade to step 4.
//!
//! # Modules
//!
//! - [`cache`] - Concurrent result cache with an explicit lifetime
//! - [`client`] - External geocoding client trait and Google implementation
//! - [`resolver`] - The resolution pipeline
//! - [`stats`] - Per-sheet geocoding statistics

pub mod cache;
pub mod client;
pub mod resolver;
pub mod stats;

#[cfg(test)]
pub mod tests;

pub use cache::{GeocodeCache, cache_key};
pub use client::{GeocodeQuery, GeocodingClient, GoogleGeocodingClient};
pub use resolver::GeocodingResolver;
pub use stats::GeocodeStats;
