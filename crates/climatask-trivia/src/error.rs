//! Trivia-specific error types.

use climatask_core::{AppError, NetworkError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TriviaError {
    #[error("Trivia service unavailable: {0}")]
    Unavailable(#[from] NetworkError),

    #[error("Malformed trivia response: {0}")]
    Malformed(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl TriviaError {
    /// User-friendly error message for UI display.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::Unavailable(e) => e.user_message(),
            Self::Malformed(_) => "Failed to load questions. Please try another category.",
            Self::InvalidEndpoint(_) => "Trivia service is misconfigured. Check settings.",
        }
    }

    /// Whether the same request may succeed later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }
}

impl From<TriviaError> for AppError {
    fn from(err: TriviaError) -> Self {
        match err {
            TriviaError::Unavailable(e) => AppError::ProviderUnavailable(e),
            TriviaError::Malformed(msg) => AppError::MalformedResponse(msg),
            TriviaError::InvalidEndpoint(msg) => {
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
        assert!(TriviaError::Malformed("x".into())
            .user_message()
            .contains("another category"));
        assert!(TriviaError::Unavailable(NetworkError::Timeout)
            .user_message()
            .contains("timed out"));
    }

    #[test]
    fn test_rate_limit_maps_to_provider_unavailable() {
        let err = TriviaError::Unavailable(NetworkError::RateLimited("code 5".into()));
        assert!(err.is_retryable());
        let app: AppError = err.into();
        assert!(matches!(app, AppError::ProviderUnavailable(_)));
    }
}
