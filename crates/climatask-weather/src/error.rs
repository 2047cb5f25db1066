//! Weather-specific error types.

use climatask_core::{AppError, NetworkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Missing location info")]
    MissingLocation,

    #[error("Weather service unavailable: {0}")]
    Unavailable(#[from] NetworkError),

    #[error("Malformed weather response: {0}")]
    Malformed(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl WeatherError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::LocationNotFound(_) => "City not found.",
            Self::MissingLocation => "Missing location info.",
            Self::Unavailable(e) => e.user_message(),
            Self::Malformed(_) => "Weather data came back incomplete. Please try again.",
            Self::InvalidEndpoint(_) => "Weather service is misconfigured. Check settings.",
        }
    }

    /// Whether this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<WeatherError> for AppError {
    fn from(err: WeatherError) -> Self {
        match err {
            WeatherError::LocationNotFound(place) => AppError::LocationNotFound(place),
            WeatherError::MissingLocation => AppError::LocationNotFound(String::new()),
            WeatherError::Unavailable(e) => AppError::ProviderUnavailable(e),
            WeatherError::Malformed(msg) => AppError::MalformedResponse(msg),
            WeatherError::InvalidEndpoint(msg) => {
                AppError::Config(climatask_core::ConfigError::Invalid(msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        assert!(WeatherError::LocationNotFound("Atlantis".into())
            .user_message()
            .contains("not found"));
        assert!(WeatherError::Unavailable(NetworkError::Timeout)
            .user_message()
            .contains("timed out"));
    }

    #[test]
    fn test_is_retryable() {
        assert!(WeatherError::Unavailable(NetworkError::Timeout).is_retryable());
        assert!(!WeatherError::LocationNotFound("x".into()).is_retryable());
        assert!(!WeatherError::Malformed("x".into()).is_retryable());
    }

    #[test]
    fn test_app_error_mapping() {
        let app: AppError = WeatherError::LocationNotFound("Atlantis".into()).into();
        assert!(matches!(app, AppError::LocationNotFound(ref p) if p == "Atlantis"));

        let app: AppError = WeatherError::Malformed("no daily".into()).into();
        assert!(matches!(app, AppError::MalformedResponse(_)));
    }
}
