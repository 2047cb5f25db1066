//! Weather service for Climatask
//!
//! Provides forecasts via the Open-Meteo API, place-name geocoding via
//! Nominatim, and the WMO weather code table shared by every view.

pub mod codes;
pub mod error;
pub mod geocode;
pub mod provider;
pub mod types;
pub mod view;

pub use error::WeatherError;
pub use provider::WeatherProvider;
pub use types::*;
pub use view::{current_conditions, upcoming_days, CurrentConditions, DayCard};
