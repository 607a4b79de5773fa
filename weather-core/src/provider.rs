use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use std::fmt::Debug;

use crate::{error::LookupError, model::GeoLocation};

pub mod open_meteo;

pub use open_meteo::OpenMeteo;

/// Resolves free text ("Paris", "Springfield, IL") to a single place.
#[async_trait]
pub trait Geocoder: Send + Sync + Debug {
    /// Best candidate for `query`. Zero candidates is [`LookupError::NotFound`].
    async fn geocode(&self, query: &str) -> Result<GeoLocation, LookupError>;
}

/// Fetches current conditions and a daily forecast for coordinates.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn forecast(&self, location: &GeoLocation, days: u8) -> Result<Forecast, LookupError>;
}

/// Provider answer before classification. Times are local to the location.
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    pub current: CurrentConditions,
    pub daily: Vec<DailyConditions>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CurrentConditions {
    pub observed_at: NaiveDateTime,
    pub weather_code: i32,
    pub temperature_c: f64,
    pub feels_like_c: f64,
    pub humidity_pct: u8,
    pub wind_speed_kmh: f64,
    pub precipitation_mm: f64,
    pub cloud_cover_pct: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyConditions {
    pub date: NaiveDate,
    pub weather_code: i32,
    pub min_temp_c: f64,
    pub max_temp_c: f64,
    pub precipitation_mm: f64,
    pub sunrise: Option<NaiveDateTime>,
    pub sunset: Option<NaiveDateTime>,
}
