//! Picnic date recommender.
//!
//! Pure functions over a daily forecast: a hard suitability filter, a score
//! for each suitable day, a stable ranking, and a packing list.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use climatask_weather::codes::{self, OVERCAST_CODES, RAIN_CODES};
use climatask_weather::{DailyForecastEntry, DailySeries, EntryError};
use serde::Serialize;

/// Recommended dates shown when no count is configured.
pub const DEFAULT_NUM_DAYS: usize = 5;

/// Manual date picks reach this many days past today.
pub const SELECTION_WINDOW_DAYS: i64 = 13;

pub const MIN_TEMP_C: f64 = 12.0;
pub const MAX_TEMP_C: f64 = 32.0;
/// Days at or above this precipitation probability are never suitable.
pub const MAX_PRECIP_PROB: u8 = 60;

const COMFORT_RANGE_C: (f64, f64) = (20.0, 28.0);
const COMFORT_BONUS: f64 = 30.0;
const WEEKEND_BONUS: f64 = 25.0;

const BASE_ITEMS: [&str; 5] = [
    "Picnic Blanket",
    "Water Bottles",
    "Snacks",
    "Hand Sanitizer",
    "Trash Bags",
];

/// Hard filter: fair sky, mild temperature, low rain chance.
pub fn is_suitable(weather_code: i32, temp_max: f64, precip_prob: u8) -> bool {
    codes::is_fair(weather_code)
        && (MIN_TEMP_C..=MAX_TEMP_C).contains(&temp_max)
        && precip_prob < MAX_PRECIP_PROB
}

/// Score a day; higher is better.
pub fn score(date: NaiveDate, temp_max: f64, precip_prob: u8) -> f64 {
    let mut score = f64::from(100 - precip_prob.min(100)) + temp_max;
    if (COMFORT_RANGE_C.0..=COMFORT_RANGE_C.1).contains(&temp_max) {
        score += COMFORT_BONUS;
    }
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        score += WEEKEND_BONUS;
    }
    score
}

/// A suitable day with its score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PicnicCandidate {
    pub date: NaiveDate,
    pub score: f64,
    pub weather_code: i32,
    pub temp_max: f64,
    pub temp_min: f64,
    pub precip_prob: u8,
    /// Position in the forecast arrays
    pub source_index: usize,
}

impl PicnicCandidate {
    fn from_entry(index: usize, entry: DailyForecastEntry) -> Option<Self> {
        if !is_suitable(entry.weather_code, entry.temp_max, entry.precip_prob) {
            return None;
        }
        Some(Self {
            date: entry.date,
            score: score(entry.date, entry.temp_max, entry.precip_prob),
            weather_code: entry.weather_code,
            temp_max: entry.temp_max,
            temp_min: entry.temp_min,
            precip_prob: entry.precip_prob,
            source_index: index,
        })
    }
}

/// A forecast position left out of ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDay {
    pub index: usize,
    pub reason: EntryError,
}

/// Ranked candidates plus the days that could not be read.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recommendation {
    pub candidates: Vec<PicnicCandidate>,
    pub skipped: Vec<SkippedDay>,
}

impl Recommendation {
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn contains_index(&self, index: usize) -> bool {
        self.candidates.iter().any(|c| c.source_index == index)
    }
}

/// Rank suitable days by score, best first, keeping forecast order on ties.
///
/// Returns at most `num_days` candidates. Malformed days are skipped and
/// reported in [`Recommendation::skipped`]; an empty candidate list is a
/// valid result.
pub fn find_best_dates(series: &DailySeries, num_days: usize) -> Recommendation {
    let mut recommendation = Recommendation::default();

    for (index, entry) in series.entries() {
        match entry {
            Ok(entry) => {
                if let Some(candidate) = PicnicCandidate::from_entry(index, entry) {
                    recommendation.candidates.push(candidate);
                }
            }
            Err(reason) => {
                tracing::warn!("Skipping forecast day {}: {}", index, reason);
                recommendation.skipped.push(SkippedDay { index, reason });
            }
        }
    }

    // sort_by is stable
    recommendation
        .candidates
        .sort_by(|a, b| b.score.total_cmp(&a.score));
    recommendation.candidates.truncate(num_days);

    tracing::debug!(
        "Ranked {} picnic candidates ({} days skipped)",
        recommendation.candidates.len(),
        recommendation.skipped.len()
    );
    recommendation
}

/// Packing list for a day: the base items, then one group per matching rule.
pub fn recommend_items(weather_code: i32, temp_max: f64) -> Vec<String> {
    let mut items: Vec<&str> = BASE_ITEMS.to_vec();

    if codes::is_fair(weather_code) {
        items.extend(["Sunscreen", "Sunglasses", "Hat"]);
    }
    if OVERCAST_CODES.contains(&weather_code) {
        items.push("Light Jacket");
    }
    if RAIN_CODES.contains(&weather_code) {
        items.extend(["Umbrella", "Raincoat"]);
    }
    if temp_max > 25.0 {
        items.extend(["Extra Water", "Cooler with Ice"]);
    }
    if temp_max < 18.0 {
        items.push("Warm Beverages");
    }

    items.into_iter().map(String::from).collect()
}

/// The forecast day at `index`, or `None` if it is out of range or malformed.
pub fn day_details(series: &DailySeries, index: usize) -> Option<DailyForecastEntry> {
    series.entry(index).ok()
}

/// Forecast position of a manually picked date.
///
/// Assumes the forecast's first daily entry is `today` and the entries are
/// contiguous days. Dates before today give `None`.
pub fn index_for_date(today: NaiveDate, date: NaiveDate) -> Option<usize> {
    usize::try_from((date - today).num_days()).ok()
}

/// Dates a user may pick by hand, today first.
pub fn selectable_dates(today: NaiveDate) -> Vec<NaiveDate> {
    today
        .iter_days()
        .take_while(|d| *d <= today + Duration::days(SELECTION_WINDOW_DAYS))
        .collect()
}

/// How a selected day compares to the ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayVerdict {
    Recommended,
    GoodConditions,
    ConsiderAnotherDay,
}

impl DayVerdict {
    pub fn for_day(index: usize, day: &DailyForecastEntry, ranking: &Recommendation) -> Self {
        if ranking.contains_index(index) {
            Self::Recommended
        } else if is_suitable(day.weather_code, day.temp_max, day.precip_prob) {
            Self::GoodConditions
        } else {
            Self::ConsiderAnotherDay
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::Recommended => "Perfect picnic weather! Enjoy your day!",
            Self::GoodConditions => "Good conditions",
            Self::ConsiderAnotherDay => "Consider another day for better weather",
        }
    }
}
