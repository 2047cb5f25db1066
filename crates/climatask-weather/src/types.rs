use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Geographic location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: Option<String>,
}

/// What the user asked the forecast for
#[derive(Debug, Clone, PartialEq)]
pub enum LocationQuery {
    /// Free-text place name, resolved through geocoding
    Place(String),
    /// Explicit coordinates, no geocoding needed
    Coordinates { latitude: f64, longitude: f64 },
}

impl LocationQuery {
    pub fn place(name: impl Into<String>) -> Self {
        Self::Place(name.into())
    }
}

/// Current conditions block (`current_weather=true`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub temperature: f64,
    pub windspeed: f64,
    #[serde(default)]
    pub winddirection: Option<f64>,
    pub weathercode: i32,
    #[serde(default)]
    pub time: Option<String>,
}

/// Hourly arrays, aligned by index
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HourlySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub temperature_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub relative_humidity_2m: Vec<Option<f64>>,
    #[serde(default)]
    pub wind_speed_10m: Vec<Option<f64>>,
}

/// Daily arrays, aligned by index.
///
/// Every field defaults to empty so a response missing a column still parses;
/// gaps are reported per day by [`DailySeries::entry`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DailySeries {
    #[serde(default)]
    pub time: Vec<String>,
    #[serde(default)]
    pub weathercode: Vec<Option<i32>>,
    #[serde(default)]
    pub temperature_2m_max: Vec<Option<f64>>,
    #[serde(default)]
    pub temperature_2m_min: Vec<Option<f64>>,
    #[serde(default)]
    pub precipitation_probability_max: Vec<Option<i32>>,
    #[serde(default)]
    pub sunrise: Vec<Option<String>>,
    #[serde(default)]
    pub sunset: Vec<Option<String>>,
    #[serde(default)]
    pub uv_index_max: Vec<Option<f64>>,
}

/// Why a daily position could not be turned into an entry
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EntryError {
    #[error("index {0} is past the end of the forecast")]
    OutOfRange(usize),

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("values at index {0} have no date")]
    Undated(usize),

    #[error("invalid date {0:?}")]
    InvalidDate(String),

    #[error("precipitation probability {0} outside 0-100")]
    InvalidProbability(i32),
}

/// One forecast day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyForecastEntry {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub temp_max: f64,
    pub temp_min: f64,
    pub precip_prob: u8,
}

fn value_at<T: Clone>(values: &[Option<T>], index: usize, field: &'static str) -> Result<T, EntryError> {
    values
        .get(index)
        .cloned()
        .flatten()
        .ok_or(EntryError::MissingField(field))
}

impl DailySeries {
    /// Number of forecast days, as given by the `time` column.
    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Length of the longest column; more than `len()` when some column runs
    /// past the dates.
    pub fn row_count(&self) -> usize {
        [
            self.time.len(),
            self.weathercode.len(),
            self.temperature_2m_max.len(),
            self.temperature_2m_min.len(),
            self.precipitation_probability_max.len(),
            self.sunrise.len(),
            self.sunset.len(),
            self.uv_index_max.len(),
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Build the entry at `index`, reporting the first missing or invalid value.
    pub fn entry(&self, index: usize) -> Result<DailyForecastEntry, EntryError> {
        let Some(raw_date) = self.time.get(index) else {
            return Err(if index < self.row_count() {
                EntryError::Undated(index)
            } else {
                EntryError::OutOfRange(index)
            });
        };
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d")
            .map_err(|_| EntryError::InvalidDate(raw_date.clone()))?;

        let weather_code = value_at(&self.weathercode, index, "weathercode")?;
        let temp_max = value_at(&self.temperature_2m_max, index, "temperature_2m_max")?;
        let temp_min = value_at(&self.temperature_2m_min, index, "temperature_2m_min")?;
        let precip = value_at(
            &self.precipitation_probability_max,
            index,
            "precipitation_probability_max",
        )?;
        let precip_prob = u8::try_from(precip)
            .ok()
            .filter(|p| *p <= 100)
            .ok_or(EntryError::InvalidProbability(precip))?;

        Ok(DailyForecastEntry {
            date,
            weather_code,
            temp_max,
            temp_min,
            precip_prob,
        })
    }

    /// All rows in order, each either an entry or the reason it is unusable.
    /// Values past the end of `time` show up as `Undated` rows.
    pub fn entries(&self) -> impl Iterator<Item = (usize, Result<DailyForecastEntry, EntryError>)> + '_ {
        (0..self.row_count()).map(move |i| (i, self.entry(i)))
    }
}

/// Forecast response as returned by Open-Meteo
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResult {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
    #[serde(default)]
    pub hourly: Option<HourlySeries>,
    #[serde(default)]
    pub daily: Option<DailySeries>,
    /// Resolved location the forecast was requested for
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl ForecastResult {
    /// Daily series, or an empty one when the response had none.
    pub fn daily_or_empty(&self) -> std::borrow::Cow<'_, DailySeries> {
        match &self.daily {
            Some(daily) => std::borrow::Cow::Borrowed(daily),
            None => std::borrow::Cow::Owned(DailySeries::default()),
        }
    }
}
