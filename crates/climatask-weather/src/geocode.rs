//! Forward geocoding: turn a place name into coordinates.
//! Uses Nominatim (OpenStreetMap) - free, no API key required.

use climatask_core::{status_error, with_retry, ReqwestErrorExt, RetryConfig};
use reqwest::Client;
use serde::Deserialize;
use url::Url;

use crate::error::WeatherError;
use crate::types::Location;

pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

/// Resolve a place name to the best matching location.
pub async fn geocode(
    client: &Client,
    endpoint: &Url,
    retry: &RetryConfig,
    place: &str,
) -> Result<Location, WeatherError> {
    let place = place.trim();
    if place.is_empty() {
        return Err(WeatherError::MissingLocation);
    }

    tracing::debug!("Geocoding {:?}", place);

    let response = with_retry(retry, || {
        client
            .get(endpoint.clone())
            .query(&[("q", place), ("format", "json"), ("limit", "1")])
            .send()
    })
    .await
    .map_err(|e| WeatherError::Unavailable(e.into_network_error()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(WeatherError::Unavailable(status_error(status, &body)));
    }

    let places: Vec<NominatimPlace> = response
        .json()
        .await
        .map_err(|e| WeatherError::Malformed(format!("geocoding response: {}", e)))?;

    let best = places
        .into_iter()
        .next()
        .ok_or_else(|| WeatherError::LocationNotFound(place.to_string()))?;

    let latitude: f64 = best
        .lat
        .parse()
        .map_err(|_| WeatherError::Malformed(format!("latitude {:?}", best.lat)))?;
    let longitude: f64 = best
        .lon
        .parse()
        .map_err(|_| WeatherError::Malformed(format!("longitude {:?}", best.lon)))?;

    tracing::info!("Geocoded {:?} to {}, {}", place, latitude, longitude);
    Ok(Location {
        latitude,
        longitude,
        display_name: best.display_name,
    })
}
