pub mod app;
pub mod config;
pub mod error;
pub mod retry;

pub use app::App;
pub use config::{
    Config, PlannerConfig, StorageConfig, TriviaConfig, ValidationResult, WeatherConfig,
};
pub use error::{
    status_error, AppError, ConfigError, NetworkError, PersistenceError, ReqwestErrorExt,
};
pub use retry::{with_retry, RetryConfig};

use anyhow::Result;

/// Initialize logging for the dashboard
pub fn init() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    tracing::info!("Climatask core initialized");
    Ok(())
}
