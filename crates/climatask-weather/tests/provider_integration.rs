//! Integration tests for WeatherProvider using wiremock.

use climatask_core::{NetworkError, RetryConfig, WeatherConfig};
use climatask_weather::{LocationQuery, WeatherError, WeatherProvider};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider_for(server: &MockServer) -> WeatherProvider {
    let config = WeatherConfig {
        forecast_url: format!("{}/v1/forecast", server.uri()),
        geocode_url: format!("{}/search", server.uri()),
        forecast_days: 14,
        request_timeout_secs: 5,
    };
    WeatherProvider::new(&config)
        .unwrap()
        .with_retry_config(RetryConfig::none())
}

fn forecast_body() -> serde_json::Value {
    serde_json::json!({
        "latitude": 48.86,
        "longitude": 2.35,
        "timezone": "Europe/Paris",
        "current_weather": {"temperature": 21.4, "windspeed": 8.0, "weathercode": 1},
        "daily": {
            "time": ["2026-06-05", "2026-06-06"],
            "weathercode": [1, 61],
            "temperature_2m_max": [24.0, 19.0],
            "temperature_2m_min": [14.0, 12.0],
            "precipitation_probability_max": [10, 80]
        }
    })
}

#[tokio::test]
async fn test_fetch_forecast_by_place() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Paris"))
        .and(query_param("format", "json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"lat": "48.8566", "lon": "2.3522", "display_name": "Paris, France"}
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "48.8566"))
        .and(query_param("forecast_days", "14"))
        .and(query_param("current_weather", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let forecast = provider
        .fetch_forecast(&LocationQuery::place("Paris"))
        .await
        .unwrap();

    let daily = forecast.daily.as_ref().unwrap();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily.entry(1).unwrap().weather_code, 61);
    assert_eq!(
        forecast.location.unwrap().display_name.as_deref(),
        Some("Paris, France")
    );
}

#[tokio::test]
async fn test_unknown_city_is_location_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .fetch_forecast(&LocationQuery::place("Atlantis"))
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::LocationNotFound(ref p) if p == "Atlantis"));
}

#[tokio::test]
async fn test_server_error_is_provider_unavailable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .fetch_forecast(&LocationQuery::Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        WeatherError::Unavailable(NetworkError::ServerError { status: 503, .. })
    ));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_garbage_body_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .fetch_forecast(&LocationQuery::Coordinates {
            latitude: 1.0,
            longitude: 2.0,
        })
        .await
        .unwrap_err();

    assert!(matches!(err, WeatherError::Malformed(_)));
}
