//! Retry utilities for provider requests with exponential backoff.
//!
//! Transient failures are retried:
//! - Timeouts
//! - 5xx server errors, 408 and 429
//! - Connection resets
//!
//! 4xx client errors are returned as-is.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

/// Default retry configuration
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 100;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5000;

/// Retry configuration
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,
    /// Initial delay between retries (doubles each attempt)
    pub initial_delay: Duration,
    /// Maximum delay between retries
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    /// Create a new retry config with custom settings
    pub fn new(max_retries: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_retries,
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// No retries at all
    pub fn none() -> Self {
        Self::new(0, 0, 0)
    }

    /// Calculate the delay for a given attempt number
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = 2u64.saturating_pow(attempt);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        let capped = delay_ms.min(self.max_delay.as_millis() as u64);
        Duration::from_millis(capped)
    }
}

/// Error classification for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// Check if a reqwest error is retryable
pub fn is_retryable_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() {
        tracing::debug!("Request timed out, will retry");
        return RetryDecision::Retry;
    }

    if error.is_connect() {
        tracing::debug!("Connection error, will retry");
        return RetryDecision::Retry;
    }

    if error.is_request() {
        return RetryDecision::NoRetry;
    }

    if let Some(status) = error.status() {
        return is_retryable_status(status);
    }

    RetryDecision::NoRetry
}

/// Check if a status code is retryable
pub fn is_retryable_status(status: StatusCode) -> RetryDecision {
    if status.is_server_error()
        || status == StatusCode::TOO_MANY_REQUESTS
        || status == StatusCode::REQUEST_TIMEOUT
    {
        tracing::debug!("Retryable status {}", status);
        return RetryDecision::Retry;
    }

    RetryDecision::NoRetry
}

/// Execute an HTTP request with retry logic.
///
/// Returns the first non-retryable response, the last response once retries
/// are exhausted, or the last transport error.
///
/// ```ignore
/// let response = with_retry(&RetryConfig::default(), || client.get(url.clone()).send()).await?;
/// ```
pub async fn with_retry<F, Fut>(config: &RetryConfig, operation: F) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 0;

    loop {
        if attempt > 0 {
            let delay = config.delay_for_attempt(attempt - 1);
            tracing::info!(
                "Retry attempt {} of {}, waiting {:?}",
                attempt,
                config.max_retries,
                delay
            );
            tokio::time::sleep(delay).await;
        }

        let exhausted = attempt >= config.max_retries;

        match operation().await {
            Ok(response) => {
                let status = response.status();
                if is_retryable_status(status) == RetryDecision::Retry && !exhausted {
                    tracing::warn!(
                        "Request returned retryable status {}, attempt {} of {}",
                        status,
                        attempt + 1,
                        config.max_retries + 1
                    );
                    attempt += 1;
                    continue;
                }

                if attempt > 0 {
                    tracing::info!("Request finished after {} retries", attempt);
                }
                return Ok(response);
            }
            Err(e) => {
                if is_retryable_error(&e) == RetryDecision::NoRetry || exhausted {
                    tracing::debug!("Giving up on request: {}", e);
                    return Err(e);
                }

                tracing::warn!(
                    "Retryable error on attempt {} of {}: {}",
                    attempt + 1,
                    config.max_retries + 1,
                    e
                );
                attempt += 1;
            }
        }
    }
}
