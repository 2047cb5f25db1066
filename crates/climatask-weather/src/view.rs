//! Weather view cards: "Now" plus the days after today.

use chrono::NaiveDate;
use serde::Serialize;

use crate::codes;
use crate::types::ForecastResult;

/// Number of upcoming days shown next to the "Now" card.
pub const UPCOMING_DAYS: usize = 6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentConditions {
    pub temperature: f64,
    pub wind_speed: f64,
    /// First hourly humidity sample, when the response carried one
    pub humidity: Option<f64>,
    pub icon: &'static str,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayCard {
    pub date: NaiveDate,
    pub icon: &'static str,
    pub description: String,
    pub temp_max: f64,
    pub temp_min: f64,
}

/// Build the "Now" card, `None` when the response had no current block.
pub fn current_conditions(forecast: &ForecastResult) -> Option<CurrentConditions> {
    let current = forecast.current_weather.as_ref()?;
    let humidity = forecast
        .hourly
        .as_ref()
        .and_then(|h| h.relative_humidity_2m.first().copied().flatten());

    Some(CurrentConditions {
        temperature: current.temperature,
        wind_speed: current.windspeed,
        humidity,
        icon: codes::icon(current.weathercode),
        description: codes::description(current.weathercode).into_owned(),
    })
}

/// Cards for the `count` days after today (positions `1..=count`).
/// Malformed days are left out.
pub fn upcoming_days(forecast: &ForecastResult, count: usize) -> Vec<DayCard> {
    let Some(daily) = forecast.daily.as_ref() else {
        return Vec::new();
    };

    daily
        .entries()
        .skip(1)
        .take(count)
        .filter_map(|(index, entry)| match entry {
            Ok(day) => Some(DayCard {
                date: day.date,
                icon: codes::icon(day.weather_code),
                description: codes::description(day.weather_code).into_owned(),
                temp_max: day.temp_max,
                temp_min: day.temp_min,
            }),
            Err(e) => {
                tracing::debug!("Skipping forecast day {}: {}", index, e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forecast() -> ForecastResult {
        serde_json::from_value(serde_json::json!({
            "latitude": 52.52,
            "longitude": 13.41,
            "current_weather": {"temperature": 18.3, "windspeed": 11.2, "weathercode": 3},
            "hourly": {
                "time": ["2026-06-06T00:00"],
                "temperature_2m": [15.0],
                "relative_humidity_2m": [71.0],
                "wind_speed_10m": [9.0]
            },
            "daily": {
                "time": ["2026-06-06", "2026-06-07", "2026-06-08", "2026-06-09"],
                "weathercode": [3, 0, 95, 42],
                "temperature_2m_max": [20.0, 25.5, 19.0, 17.0],
                "temperature_2m_min": [11.0, 13.0, null, 9.0],
                "precipitation_probability_max": [20, 0, 90, 10]
            }
        }))
        .unwrap()
    }

    #[test]
    fn test_current_conditions() {
        let now = current_conditions(&forecast()).unwrap();
        assert_eq!(now.temperature, 18.3);
        assert_eq!(now.humidity, Some(71.0));
        assert_eq!(now.description, "Overcast");
    }

    #[test]
    fn test_current_conditions_absent() {
        let mut f = forecast();
        f.current_weather = None;
        assert!(current_conditions(&f).is_none());
    }

    #[test]
    fn test_upcoming_days_skip_today_and_bad_days() {
        let cards = upcoming_days(&forecast(), UPCOMING_DAYS);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].date, NaiveDate::from_ymd_opt(2026, 6, 7).unwrap());
        assert_eq!(cards[0].description, "Clear sky");
        assert_eq!(cards[1].description, "Unknown (42)");
    }
}
