//! Centralized error types for the Climatask dashboard.
//!
//! This module provides the shared part of the error taxonomy:
//! - Network failures from any provider (weather, geocoding, trivia)
//! - Persistence failures from the streak and plan stores
//! - Configuration problems
//!
//! Provider crates define their own error enums and convert into [`AppError`]
//! at the application edge. Use `user_message()` for UI text.

use thiserror::Error;

/// Top-level application error type.
///
/// Every provider or store error can be converted into this type.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(#[from] NetworkError),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("No content available: {0}")]
    NoContentAvailable(String),

    #[error("Persistence error: {0}")]
    Persistence(#[from] PersistenceError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// An action the current state does not allow; `hint` is shown to the user.
    #[error("Action refused: {reason}")]
    Refused { reason: String, hint: &'static str },
}

impl AppError {
    /// Returns a user-friendly message suitable for display.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::LocationNotFound(_) => "City not found. Check the name and try again.",
            AppError::ProviderUnavailable(e) => e.user_message(),
            AppError::MalformedResponse(_) => {
                "Received an unexpected response. Please try again."
            }
            AppError::NoContentAvailable(_) => {
                "No more content is available here. Try another one!"
            }
            AppError::Persistence(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "A file operation failed. Please try again.",
            AppError::Refused { hint, .. } => *hint,
        }
    }

    /// Whether retrying the same action may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::ProviderUnavailable(_) | AppError::NoContentAvailable(_)
        )
    }
}

/// Network-related errors (HTTP, connectivity).
#[derive(Debug, Clone, Error)]
pub enum NetworkError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Request timed out")]
    Timeout,

    #[error("Server error: {status} - {message}")]
    ServerError { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),
}

impl NetworkError {
    pub fn user_message(&self) -> &'static str {
        match self {
            NetworkError::ConnectionFailed(_) => {
                "Unable to connect. Check your internet connection."
            }
            NetworkError::Timeout => "The request timed out. Please try again.",
            NetworkError::ServerError { status, .. } if *status >= 500 => {
                "The service is experiencing issues. Please try again later."
            }
            NetworkError::ServerError { .. } => "The request failed. Please try again.",
            NetworkError::RateLimited(_) => "Too many requests. Please wait a moment.",
        }
    }
}

/// Store read/write errors (streak and plan files).
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to lock {path}: {message}")]
    Lock { path: String, message: String },

    #[error("Failed to serialize: {0}")]
    Serialize(String),
}

impl PersistenceError {
    pub fn read(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Self::Read {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn write(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Self::Write {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn lock(path: impl AsRef<std::path::Path>, message: impl ToString) -> Self {
        Self::Lock {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            PersistenceError::Read { .. } => "Saved data could not be read.",
            PersistenceError::Write { .. } | PersistenceError::Serialize(_) => {
                "Your changes could not be saved. Please try again."
            }
            PersistenceError::Lock { .. } => {
                "Saved data is busy in another window. Please try again."
            }
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::NotFound(_) => "Configuration not found. Using defaults.",
            ConfigError::Invalid(_) => "Invalid configuration. Check your settings.",
            ConfigError::ParseError(_) => "Configuration file is malformed. Check your settings.",
        }
    }
}

/// Extension trait for converting reqwest errors to our error types.
pub trait ReqwestErrorExt {
    fn into_network_error(self) -> NetworkError;
}

impl ReqwestErrorExt for reqwest::Error {
    fn into_network_error(self) -> NetworkError {
        if self.is_timeout() {
            NetworkError::Timeout
        } else if self.is_connect() {
            NetworkError::ConnectionFailed(self.to_string())
        } else if let Some(status) = self.status() {
            NetworkError::ServerError {
                status: status.as_u16(),
                message: self.to_string(),
            }
        } else {
            NetworkError::ConnectionFailed(self.to_string())
        }
    }
}

/// Classify a non-success HTTP status.
pub fn status_error(status: reqwest::StatusCode, body: &str) -> NetworkError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        NetworkError::RateLimited(body.to_string())
    } else {
        NetworkError::ServerError {
            status: status.as_u16(),
            message: body.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_error_conversion() {
        let app_err: AppError = NetworkError::Timeout.into();
        assert!(matches!(
            app_err,
            AppError::ProviderUnavailable(NetworkError::Timeout)
        ));
        assert!(app_err.is_retryable());
    }

    #[test]
    fn test_user_message_propagation() {
        let app_err = AppError::ProviderUnavailable(NetworkError::Timeout);
        assert_eq!(
            app_err.user_message(),
            "The request timed out. Please try again."
        );
    }

    #[test]
    fn test_server_error_messages_split_on_5xx() {
        let upstream = NetworkError::ServerError {
            status: 503,
            message: "down".into(),
        };
        let client = NetworkError::ServerError {
            status: 400,
            message: "bad".into(),
        };
        assert_ne!(upstream.user_message(), client.user_message());
    }

    #[test]
    fn test_persistence_error_is_not_retryable() {
        let err: AppError = PersistenceError::write("/tmp/streak.json", "disk full").into();
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("streak.json"));
        assert!(err.user_message().contains("could not be saved"));
    }

    #[test]
    fn test_refused_shows_hint() {
        let err = AppError::Refused {
            reason: "quiz already played".into(),
            hint: "Come back tomorrow.",
        };
        assert_eq!(err.user_message(), "Come back tomorrow.");
        assert!(err.to_string().contains("quiz already played"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_status_error_rate_limit() {
        let err = status_error(reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down");
        assert!(matches!(err, NetworkError::RateLimited(_)));

        let err = status_error(reqwest::StatusCode::BAD_GATEWAY, "");
        assert!(matches!(err, NetworkError::ServerError { status: 502, .. }));
    }
}
