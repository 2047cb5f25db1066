use anyhow::{Context, Result};
use std::sync::Arc;

use crate::Config;

/// Application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from the user's config file
    pub fn new() -> Result<Self> {
        let (config, _) = Config::load_validated()?;
        Ok(Self::with_config(config))
    }

    /// Create an application instance around an already loaded config
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Prepare the data directory used by the streak and plan stores
    pub fn initialize(&mut self) -> Result<()> {
        let data_dir = &self.config.storage.data_dir;
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        tracing::info!("Application initialized (data in {})", data_dir.display());
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the config
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initialize_creates_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.storage.data_dir = dir.path().join("data");

        let mut app = App::with_config(config);
        app.initialize().unwrap();
        assert!(app.config().storage.data_dir.is_dir());
        app.shutdown().unwrap();
    }
}
