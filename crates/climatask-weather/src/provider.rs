//! Open-Meteo forecast client.

use climatask_core::{status_error, with_retry, ReqwestErrorExt, RetryConfig, WeatherConfig};
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::error::WeatherError;
use crate::geocode::geocode;
use crate::types::{ForecastResult, Location, LocationQuery};

const USER_AGENT: &str = "Climatask/0.1.0 (weather dashboard)";
const HOURLY_FIELDS: &str = "temperature_2m,relative_humidity_2m,wind_speed_10m";
const DAILY_FIELDS: &str = "weathercode,temperature_2m_max,temperature_2m_min,\
precipitation_probability_max,sunrise,sunset,uv_index_max";

#[derive(Debug, Clone)]
pub struct WeatherProvider {
    client: Arc<Client>,
    forecast_url: Url,
    geocode_url: Url,
    forecast_days: u32,
    retry: RetryConfig,
}

fn parse_endpoint(raw: &str) -> Result<Url, WeatherError> {
    Url::parse(raw).map_err(|e| WeatherError::InvalidEndpoint(format!("{}: {}", raw, e)))
}

impl WeatherProvider {
    pub fn new(config: &WeatherConfig) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| WeatherError::Unavailable(e.into_network_error()))?;

        Ok(Self {
            client: Arc::new(client),
            forecast_url: parse_endpoint(&config.forecast_url)?,
            geocode_url: parse_endpoint(&config.geocode_url)?,
            forecast_days: config.forecast_days,
            retry: RetryConfig::default(),
        })
    }

    /// Replace the retry policy (tests use [`RetryConfig::none`]).
    pub fn with_retry_config(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn forecast_days(&self) -> u32 {
        self.forecast_days
    }

    /// Turn a query into coordinates, geocoding place names.
    pub async fn resolve(&self, query: &LocationQuery) -> Result<Location, WeatherError> {
        match query {
            LocationQuery::Place(name) => {
                geocode(&self.client, &self.geocode_url, &self.retry, name).await
            }
            LocationQuery::Coordinates {
                latitude,
                longitude,
            } => Ok(Location {
                latitude: *latitude,
                longitude: *longitude,
                display_name: None,
            }),
        }
    }

    /// Resolve the query and fetch its forecast.
    pub async fn fetch_forecast(&self, query: &LocationQuery) -> Result<ForecastResult, WeatherError> {
        let location = self.resolve(query).await?;
        self.fetch_forecast_at(&location).await
    }

    /// Fetch the forecast for known coordinates.
    pub async fn fetch_forecast_at(&self, location: &Location) -> Result<ForecastResult, WeatherError> {
        tracing::debug!(
            "Fetching {} day forecast for {}, {}",
            self.forecast_days,
            location.latitude,
            location.longitude
        );

        let latitude = location.latitude.to_string();
        let longitude = location.longitude.to_string();
        let days = self.forecast_days.to_string();
        let params = [
            ("latitude", latitude.as_str()),
            ("longitude", longitude.as_str()),
            ("hourly", HOURLY_FIELDS),
            ("daily", DAILY_FIELDS),
            ("current_weather", "true"),
            ("timezone", "auto"),
            ("forecast_days", days.as_str()),
        ];

        let response = with_retry(&self.retry, || {
            self.client
                .get(self.forecast_url.clone())
                .query(&params)
                .send()
        })
        .await
        .map_err(|e| WeatherError::Unavailable(e.into_network_error()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!("Forecast request failed with {}: {}", status, body);
            return Err(WeatherError::Unavailable(status_error(status, &body)));
        }

        let mut forecast: ForecastResult = response
            .json()
            .await
            .map_err(|e| WeatherError::Malformed(format!("forecast response: {}", e)))?;
        forecast.location = Some(location.clone());

        tracing::info!(
            "Fetched forecast with {} daily entries",
            forecast.daily.as_ref().map_or(0, |d| d.len())
        );
        Ok(forecast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_rejects_bad_endpoint() {
        let config = WeatherConfig {
            forecast_url: "not a url".into(),
            ..WeatherConfig::default()
        };
        let err = WeatherProvider::new(&config).unwrap_err();
        assert!(matches!(err, WeatherError::InvalidEndpoint(_)));
    }

    #[tokio::test]
    async fn test_coordinates_skip_geocoding() {
        let provider = WeatherProvider::new(&WeatherConfig::default()).unwrap();
        let location = provider
            .resolve(&LocationQuery::Coordinates {
                latitude: 1.5,
                longitude: -2.25,
            })
            .await
            .unwrap();
        assert_eq!(location.latitude, 1.5);
        assert_eq!(location.longitude, -2.25);
        assert!(location.display_name.is_none());
    }
}
