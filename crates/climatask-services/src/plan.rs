//! Picnic plans and the draft a user edits before saving one.

use chrono::{NaiveDate, NaiveDateTime, Timelike};
use climatask_weather::{codes, DailyForecastEntry};
use serde::{Deserialize, Serialize};

use crate::picnic::recommend_items;

pub const UNNAMED_PLAN: &str = "Unnamed Plan";

fn unnamed() -> String {
    UNNAMED_PLAN.to_string()
}

/// A saved picnic plan. Never edited after it is appended to a store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PicnicPlan {
    pub date: NaiveDate,
    #[serde(default = "unnamed")]
    pub name: String,
    pub items: Vec<String>,
    #[serde(default)]
    pub participants: Vec<String>,
    #[serde(rename = "weather")]
    pub weather_summary: String,
    pub temperature: String,
    #[serde(rename = "created", default, with = "minute_timestamp")]
    pub created_at: Option<NaiveDateTime>,
}

/// `created` is stored as local time with minute precision.
mod minute_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(ts) => serializer.serialize_str(&ts.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|raw| NaiveDateTime::parse_from_str(&raw, FORMAT))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}

/// Split free text into participant names: one per line, trimmed, blanks dropped.
pub fn parse_participants(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(String::from)
        .collect()
}

/// Format a temperature the way plans store it, e.g. `24.0°C`.
pub fn format_temperature(temp_max: f64) -> String {
    format!("{:.1}°C", temp_max)
}

/// Editable plan for one forecast day.
///
/// The packing list is the recommended items followed by custom items; every
/// item starts checked.
#[derive(Debug, Clone)]
pub struct PlanDraft {
    day: DailyForecastEntry,
    name: String,
    custom_items: Vec<String>,
    unchecked: Vec<String>,
    participants: Vec<String>,
}

impl PlanDraft {
    pub fn for_day(day: DailyForecastEntry) -> Self {
        Self {
            day,
            name: String::new(),
            custom_items: Vec::new(),
            unchecked: Vec::new(),
            participants: Vec::new(),
        }
    }

    pub fn day(&self) -> &DailyForecastEntry {
        &self.day
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.trim().to_string();
    }

    /// Add a custom item. Blank input is ignored and returns `false`.
    pub fn add_custom_item(&mut self, item: &str) -> bool {
        let item = item.trim();
        if item.is_empty() {
            return false;
        }
        self.custom_items.push(item.to_string());
        true
    }

    pub fn set_participants(&mut self, text: &str) {
        self.participants = parse_participants(text);
    }

    pub fn participants(&self) -> &[String] {
        &self.participants
    }

    /// Uncheck (or re-check) every occurrence of an item.
    pub fn set_checked(&mut self, item: &str, checked: bool) {
        self.unchecked.retain(|u| u != item);
        if !checked {
            self.unchecked.push(item.to_string());
        }
    }

    /// Recommended items then custom items, as shown to the user.
    pub fn packing_list(&self) -> Vec<String> {
        let mut items = recommend_items(self.day.weather_code, self.day.temp_max);
        items.extend(self.custom_items.iter().cloned());
        items
    }

    /// Checked items, first occurrence kept.
    pub fn selected_items(&self) -> Vec<String> {
        let mut selected: Vec<String> = Vec::new();
        for item in self.packing_list() {
            if !self.unchecked.contains(&item) && !selected.contains(&item) {
                selected.push(item);
            }
        }
        selected
    }

    /// Freeze the draft into a plan stamped with `now` (truncated to the minute).
    pub fn finish(&self, now: NaiveDateTime) -> PicnicPlan {
        let created_at = now
            .with_second(0)
            .and_then(|ts| ts.with_nanosecond(0))
            .unwrap_or(now);

        PicnicPlan {
            date: self.day.date,
            name: if self.name.is_empty() {
                unnamed()
            } else {
                self.name.clone()
            },
            items: self.selected_items(),
            participants: self.participants.clone(),
            weather_summary: codes::description(self.day.weather_code).into_owned(),
            temperature: format_temperature(self.day.temp_max),
            created_at: Some(created_at),
        }
    }
}
