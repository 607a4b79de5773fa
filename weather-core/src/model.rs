use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::daylight::is_daytime;

/// Sky/precipitation category derived from a provider weather code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Clear,
    Foggy,
    Rainy,
    Snowy,
    Stormy,
}

impl Condition {
    pub fn label(&self) -> &'static str {
        match self {
            Condition::Clear => "Clear",
            Condition::Foggy => "Foggy",
            Condition::Rainy => "Rainy",
            Condition::Snowy => "Snowy",
            Condition::Stormy => "Stormy",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Foggy => "🌫️",
            Condition::Rainy => "🌧️",
            Condition::Snowy => "❄️",
            Condition::Stormy => "⛈️",
        }
    }

    /// UI theme identifier. Clear skies use `sunny`, the rest use the lower-cased label.
    pub fn theme(&self) -> &'static str {
        match self {
            Condition::Clear => "sunny",
            Condition::Foggy => "foggy",
            Condition::Rainy => "rainy",
            Condition::Snowy => "snowy",
            Condition::Stormy => "stormy",
        }
    }

    pub fn is_wet(&self) -> bool {
        matches!(self, Condition::Rainy | Condition::Stormy)
    }
}

impl std::fmt::Display for Condition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of classifying one weather code. Icon and theme are always read
/// from the condition, so they cannot drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub code: i32,
    pub condition: Condition,
}

impl Classification {
    pub fn icon(&self) -> &'static str {
        self.condition.icon()
    }

    pub fn theme(&self) -> &'static str {
        self.condition.theme()
    }
}

/// A resolved place: canonical display name plus coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timezone: Option<String>,
}

impl GeoLocation {
    /// Join name parts as "<name>, <region>, <country>", skipping blanks and repeats.
    pub fn format_name(name: &str, region: Option<&str>, country: Option<&str>) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(3);

        for part in [Some(name), region, country].into_iter().flatten() {
            let part = part.trim();
            if !part.is_empty() && !parts.contains(&part) {
                parts.push(part);
            }
        }

        parts.join(", ")
    }
}

/// Conditions "now" at the looked-up location. Temperatures in °C, wind in km/h.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CurrentReading {
    pub observed_at: NaiveDateTime,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub precipitation_mm: f64,
    pub cloud_cover_pct: u8,
    pub classification: Classification,
}

impl CurrentReading {
    pub fn condition(&self) -> Condition {
        self.classification.condition
    }
}

/// One forecast day, local to the location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReading {
    pub date: NaiveDate,
    /// Short weekday label, e.g. "Mon".
    pub day: String,
    pub classification: Classification,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub precipitation_mm: f64,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorTag {
    Danger,
    Warning,
    Info,
    Success,
}

impl ColorTag {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColorTag::Danger => "danger",
            ColorTag::Warning => "warning",
            ColorTag::Info => "info",
            ColorTag::Success => "success",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub icon: &'static str,
    pub text: &'static str,
    pub color: ColorTag,
}

/// Everything one successful lookup produces.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherReport {
    pub location: GeoLocation,
    pub current: CurrentReading,
    pub daily: Vec<DailyReading>,
    pub advisory: Advisory,
}

impl WeatherReport {
    /// Day/night at observation time, judged against the first forecast day.
    /// Without sunrise/sunset data this falls back to daytime.
    pub fn is_daytime(&self) -> bool {
        let Some(today) = self.daily.first() else {
            return true;
        };

        match (today.sunrise, today.sunset) {
            (Some(sunrise), Some(sunset)) => {
                is_daytime(self.current.observed_at.time(), sunrise.time(), sunset.time())
            }
            _ => true,
        }
    }
}
