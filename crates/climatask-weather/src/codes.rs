//! WMO weather code lookup shared by the weather view and the picnic planner.
//! See: https://open-meteo.com/en/docs#weathervariables

use std::borrow::Cow;

/// Icon used for codes missing from the table.
pub const FALLBACK_ICON: &str = "🌡️";

/// Clear, mainly clear and partly cloudy.
pub const FAIR_CODES: [i32; 3] = [0, 1, 2];

/// Overcast and fog.
pub const OVERCAST_CODES: [i32; 3] = [3, 45, 48];

/// Drizzle, light/moderate rain and rain showers.
pub const RAIN_CODES: [i32; 7] = [51, 53, 55, 61, 63, 80, 81];

const TABLE: &[(i32, &str, &str)] = &[
    (0, "☀️", "Clear sky"),
    (1, "🌤️", "Mainly clear"),
    (2, "🌤️", "Partly cloudy"),
    (3, "☁️", "Overcast"),
    (45, "🌫️", "Fog"),
    (48, "🌫️", "Depositing rime fog"),
    (51, "🌦️", "Light drizzle"),
    (53, "🌦️", "Moderate drizzle"),
    (55, "🌦️", "Dense drizzle"),
    (56, "🌦️", "Light freezing drizzle"),
    (57, "🌦️", "Dense freezing drizzle"),
    (61, "🌧️", "Slight rain"),
    (63, "🌧️", "Moderate rain"),
    (65, "🌧️", "Heavy rain"),
    (66, "🌧️", "Light freezing rain"),
    (67, "🌧️", "Heavy freezing rain"),
    (71, "❄️", "Slight snow fall"),
    (73, "❄️", "Moderate snow fall"),
    (75, "❄️", "Heavy snow fall"),
    (77, "❄️", "Snow grains"),
    (80, "🌦️", "Slight rain showers"),
    (81, "🌦️", "Moderate rain showers"),
    (82, "🌦️", "Violent rain showers"),
    (85, "🌨️", "Slight snow showers"),
    (86, "🌨️", "Heavy snow showers"),
    (95, "⛈️", "Thunderstorm"),
    (96, "⛈️", "Thunderstorm with hail"),
    (99, "⛈️", "Severe thunderstorm"),
];

fn lookup(code: i32) -> Option<&'static (i32, &'static str, &'static str)> {
    TABLE.iter().find(|(c, _, _)| *c == code)
}

/// Icon for a weather code, falling back to a thermometer.
pub fn icon(code: i32) -> &'static str {
    lookup(code).map_or(FALLBACK_ICON, |entry| entry.1)
}

/// Description for a weather code, `"Unknown (<code>)"` when not in the table.
pub fn description(code: i32) -> Cow<'static, str> {
    match lookup(code) {
        Some(entry) => Cow::Borrowed(entry.2),
        None => Cow::Owned(format!("Unknown ({})", code)),
    }
}

/// True for clear, mainly clear and partly cloudy skies.
pub fn is_fair(code: i32) -> bool {
    FAIR_CODES.contains(&code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes() {
        assert_eq!(description(0), "Clear sky");
        assert_eq!(icon(0), "☀️");
        assert_eq!(description(61), "Slight rain");
        assert_eq!(description(99), "Severe thunderstorm");
    }

    #[test]
    fn test_unknown_code_fallback() {
        assert_eq!(description(4), "Unknown (4)");
        assert_eq!(description(-1), "Unknown (-1)");
        assert_eq!(description(100), "Unknown (100)");
        assert_eq!(icon(4), FALLBACK_ICON);
    }

    #[test]
    fn test_every_table_entry_has_icon_and_text() {
        for (code, icon_str, text) in TABLE {
            assert!(!icon_str.is_empty(), "code {} has no icon", code);
            assert!(!text.is_empty(), "code {} has no description", code);
            assert!((0..=99).contains(code));
        }
    }

    #[test]
    fn test_fair_codes() {
        assert!(is_fair(0) && is_fair(1) && is_fair(2));
        assert!(!is_fair(3));
    }
}
