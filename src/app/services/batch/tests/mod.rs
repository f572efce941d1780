//! Shared fixtures for batch tests

use crate::app::models::Coordinates;
use crate::app::services::batch::BatchOrchestrator;
use crate::app::services::geocoding::{
    GeocodeCache, GeocodeQuery, GeocodingClient, GeocodingResolver,
};
use crate::app::services::postal_index::PostalCodeIndex;
use crate::config::Config;
use crate::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

pub mod orchestrator_tests;

/// Client that answers "not found" after a fixed delay
#[derive(Debug)]
pub struct SlowClient {
    delay: Duration,
}

#[async_trait]
impl GeocodingClient for SlowClient {
    async fn geocode(&self, _query: &GeocodeQuery) -> Result<Option<Coordinates>> {
        tokio::time::sleep(self.delay).await;
        Ok(None)
    }
}

/// Postal index knowing Orchard and Woodlands
pub fn index() -> Arc<PostalCodeIndex> {
    Arc::new(PostalCodeIndex::from_entries([
        ("238823", Coordinates::new(1.3048, 103.8318)),
        ("730888", Coordinates::new(1.4360, 103.7865)),
    ]))
}

/// Config writing into `output_dir` with no postal index files
pub fn test_config(output_dir: &Path, workers: usize) -> Config {
    Config::default()
        .with_workers(workers)
        .with_output_dir(output_dir)
        .with_postal_index_paths(Vec::new())
}

/// Orchestrator over the test index; unindexed lookups take `delay`
pub fn orchestrator(config: Config, delay: Option<Duration>) -> BatchOrchestrator {
    let client = delay.map(|delay| Arc::new(SlowClient { delay }) as Arc<dyn GeocodingClient>);
    let resolver = GeocodingResolver::new(
        index(),
        client,
        Arc::new(GeocodeCache::new()),
        Duration::from_secs(3600),
    );
    BatchOrchestrator::new(config, resolver)
}

/// Standard listing; every clinic is in the test index
pub const INDEXED_CSV: &str = "\
Panel Clinic Listing,,,,
Clinic Code,Clinic Name,Address,Tel,Mon - Fri
GP001,Orchard Clinic,391 Orchard Road Singapore 238823,6333 1111,8am - 5pm
GP002,Woodlands Clinic,Blk 888 Woodlands Drive 50 Singapore 730888,6363 1234,9am - 6pm
";

/// Standard listing with one clinic outside the test index
pub const UNINDEXED_CSV: &str = "\
Clinic Code,Clinic Name,Address,Tel,Mon - Fri
GP101,Orchard Clinic,391 Orchard Road Singapore 238823,6333 1111,8am - 5pm
GP102,Tampines Clinic,1 Tampines Ave 1 Singapore 529482,6777 2222,9am - 6pm
";

/// A file with no recognizable header
pub const MALFORMED_CSV: &str = "\
hello,world
1,2
";

pub fn write_input(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("write test input");
    path
}
