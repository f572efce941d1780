//! Geocode command: resolve one postal code or address

use super::RunSummary;
use super::shared::{load_configuration, setup_logging};
use crate::app::models::{Country, GeocodeSource};
use crate::app::services::field_rules::infer_country;
use crate::app::services::geocoding::GeocodingResolver;
use crate::cli::args::GeocodeArgs;
use crate::{Error, Result};
use serde::Serialize;
use tracing::info;

/// JSON printed for one lookup
#[derive(Debug, Serialize)]
struct GeocodeResponse<'a> {
    postal_code: &'a str,
    address: &'a str,
    country: &'static str,
    found: bool,
    latitude: Option<f64>,
    longitude: Option<f64>,
    google_map_url: String,
    source: GeocodeSource,
}

pub async fn run_geocode(args: GeocodeArgs) -> Result<RunSummary> {
    setup_logging(args.get_log_level(), false)?;
    args.validate()?;

    let config = load_configuration(args.config_file.as_deref())?;
    config.validate()?;
    let resolver = tokio::task::spawn_blocking(move || GeocodingResolver::from_config(&config))
        .await
        .map_err(|e| Error::processing_interrupted(format!("Setup task failed: {}", e)))??;

    let postal_code = args.postal_code.as_deref().unwrap_or_default().trim();
    let address = args.address.as_deref().unwrap_or_default().trim();
    let country: Country = infer_country(address, postal_code);

    let result = resolver.resolve(postal_code, address, country).await;
    info!("Resolved '{}' '{}' via {:?}", postal_code, address, result.source);

    let response = GeocodeResponse {
        postal_code,
        address,
        country: country.as_str(),
        found: result.is_success(),
        latitude: result.coordinates.map(|c| c.latitude),
        longitude: result.coordinates.map(|c| c.longitude),
        google_map_url: result.map_url.clone(),
        source: result.source,
    };
    let json = serde_json::to_string_pretty(&response)
        .map_err(|e| Error::output_writing("Failed to serialize geocode result", Box::new(e)))?;
    println!("{}", json);

    Ok(RunSummary {
        lookups_failed: usize::from(!result.is_success()),
        ..RunSummary::default()
    })
}
