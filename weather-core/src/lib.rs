//! Core library for the `weather` CLI.
//!
//! This crate defines:
//! - Weather-code classification and advisory rules
//! - Temperature units and day/night determination
//! - The recent-search ledger and its key-value store abstraction
//! - Geocoding and forecast providers (Open-Meteo)
//! - The lookup pipeline and front-end session state
//! - Configuration handling
//!
//! It is used by `weather-cli`, but can also be reused by other front-ends.

pub mod advisory;
pub mod classify;
pub mod config;
pub mod daylight;
pub mod error;
pub mod model;
pub mod provider;
pub mod recent;
pub mod service;
pub mod units;

pub use advisory::advise;
pub use classify::classify;
pub use config::Config;
pub use daylight::is_daytime;
pub use error::{LookupError, USER_MESSAGE};
pub use model::{
    Advisory, Classification, ColorTag, Condition, CurrentReading, DailyReading, GeoLocation,
    WeatherReport,
};
pub use provider::{Geocoder, OpenMeteo, WeatherProvider};
pub use recent::{FileStore, KeyValueStore, MemoryStore, RecentSearches};
pub use service::{WeatherService, WeatherSession};
pub use units::{TemperatureUnit, to_display_unit};
