use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// Open-Meteo allows at most this many forecast days.
pub const MAX_FORECAST_DAYS: u32 = 16;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Weather and geocoding settings
    #[serde(default)]
    pub weather: WeatherConfig,

    /// Trivia settings
    #[serde(default)]
    pub trivia: TriviaConfig,

    /// Picnic planner settings
    #[serde(default)]
    pub planner: PlannerConfig,

    /// Where streak and plan files live
    #[serde(default)]
    pub storage: StorageConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherConfig {
    /// Open-Meteo forecast endpoint
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,

    /// Nominatim search endpoint
    #[serde(default = "default_geocode_url")]
    pub geocode_url: String,

    /// Number of forecast days requested
    #[serde(default = "default_forecast_days")]
    pub forecast_days: u32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_geocode_url() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_forecast_days() -> u32 {
    14
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            geocode_url: default_geocode_url(),
            forecast_days: default_forecast_days(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriviaConfig {
    /// Open Trivia DB question endpoint
    #[serde(default = "default_trivia_url")]
    pub api_url: String,

    /// Open Trivia DB category list endpoint
    #[serde(default = "default_categories_url")]
    pub categories_url: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_trivia_url() -> String {
    "https://opentdb.com/api.php".to_string()
}

fn default_categories_url() -> String {
    "https://opentdb.com/api_category.php".to_string()
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            api_url: default_trivia_url(),
            categories_url: default_categories_url(),
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlannerConfig {
    /// How many recommended dates to show
    #[serde(default = "default_num_days")]
    pub num_days: usize,
}

fn default_num_days() -> usize {
    5
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            num_days: default_num_days(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Directory holding `streak.json` and `picnic_plans.json`
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("climatask")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    pub fn streak_path(&self) -> PathBuf {
        self.data_dir.join("streak.json")
    }

    pub fn plans_path(&self) -> PathBuf {
        self.data_dir.join("picnic_plans.json")
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path, creating default if it doesn't exist
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Wrote default config to {}", config_path.display());
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(config_path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        self.validate_url(&self.weather.forecast_url, "weather.forecast_url", &mut result);
        self.validate_url(&self.weather.geocode_url, "weather.geocode_url", &mut result);
        self.validate_url(&self.trivia.api_url, "trivia.api_url", &mut result);
        self.validate_url(&self.trivia.categories_url, "trivia.categories_url", &mut result);

        if self.weather.forecast_days == 0 || self.weather.forecast_days > MAX_FORECAST_DAYS {
            result.add_error(
                "weather.forecast_days",
                format!("Forecast days must be between 1 and {}", MAX_FORECAST_DAYS),
            );
        } else if self.weather.forecast_days < 7 {
            result.add_warning(
                "weather.forecast_days",
                "Fewer than 7 forecast days leaves the weekly view short",
            );
        }

        if self.weather.request_timeout_secs == 0 {
            result.add_error("weather.request_timeout_secs", "Timeout must be greater than 0");
        }
        if self.trivia.request_timeout_secs == 0 {
            result.add_error("trivia.request_timeout_secs", "Timeout must be greater than 0");
        }

        if self.planner.num_days == 0 {
            result.add_error("planner.num_days", "Must recommend at least one day");
        } else if self.planner.num_days > self.weather.forecast_days as usize {
            result.add_warning(
                "planner.num_days",
                "More recommended days than forecast days requested",
            );
        }

        if self.storage.data_dir.exists() && !self.storage.data_dir.is_dir() {
            result.add_error(
                "storage.data_dir",
                format!(
                    "Path is not a directory: {}",
                    self.storage.data_dir.display()
                ),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(&self, url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("climatask");

        Ok(config_dir.join("config.toml"))
    }
}
