//! The lookup pipeline: text → coordinates → forecast → report.

use crate::{
    advisory::advise,
    classify::classify,
    config::Config,
    error::LookupError,
    model::{CurrentReading, DailyReading, GeoLocation, WeatherReport},
    provider::{Forecast, Geocoder, OpenMeteo, WeatherProvider},
    recent::{KeyValueStore, RecentSearches},
};

#[derive(Debug)]
pub struct WeatherService {
    geocoder: Box<dyn Geocoder>,
    weather: Box<dyn WeatherProvider>,
    forecast_days: u8,
}

impl WeatherService {
    pub fn new(
        geocoder: Box<dyn Geocoder>,
        weather: Box<dyn WeatherProvider>,
        forecast_days: u8,
    ) -> Self {
        Self { geocoder, weather, forecast_days }
    }

    /// Service backed by Open-Meteo for both lookups.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let open_meteo = OpenMeteo::from_config(config)?;
        Ok(Self::new(Box::new(open_meteo.clone()), Box::new(open_meteo), config.forecast_days()))
    }

    pub fn with_forecast_days(mut self, days: u8) -> Self {
        self.forecast_days = days;
        self
    }

    /// Geocode `query`, then fetch weather for the result. The second request
    /// starts only after the first has succeeded.
    pub async fn lookup(&self, query: &str) -> Result<WeatherReport, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::NotFound(String::new()));
        }

        let location = self.geocoder.geocode(query).await?;
        let forecast = self.weather.forecast(&location, self.forecast_days).await?;

        Ok(build_report(location, forecast))
    }
}

/// Classify raw provider data and derive the advisory.
pub fn build_report(location: GeoLocation, forecast: Forecast) -> WeatherReport {
    let now = forecast.current;
    let current = CurrentReading {
        observed_at: now.observed_at,
        temperature_c: now.temperature_c,
        feels_like_c: now.feels_like_c,
        humidity_pct: now.humidity_pct,
        wind_speed_kmh: now.wind_speed_kmh,
        precipitation_mm: now.precipitation_mm,
        cloud_cover_pct: now.cloud_cover_pct,
        classification: classify(now.weather_code),
    };

    let mut days = forecast.daily;
    days.sort_by_key(|d| d.date);

    let daily = days
        .into_iter()
        .map(|d| DailyReading {
            day: d.date.format("%a").to_string(),
            date: d.date,
            classification: classify(d.weather_code),
            min_temp_c: d.min_temp_c,
            max_temp_c: d.max_temp_c,
            precipitation_mm: d.precipitation_mm,
            sunrise: d.sunrise,
            sunset: d.sunset,
        })
        .collect();

    let advisory = advise(&current);

    WeatherReport { location, current, daily, advisory }
}

/// What a front-end shows: the last good report, the visible error and the
/// recent-search ledger.
///
/// `submit` borrows the session mutably, so only one lookup can be in flight.
#[derive(Debug)]
pub struct WeatherSession<S: KeyValueStore> {
    service: WeatherService,
    store: S,
    recent: RecentSearches,
    report: Option<WeatherReport>,
    error: Option<&'static str>,
}

impl<S: KeyValueStore> WeatherSession<S> {
    pub fn new(service: WeatherService, store: S) -> Self {
        let recent = RecentSearches::load(&store);
        Self { service, store, recent, report: None, error: None }
    }

    pub fn report(&self) -> Option<&WeatherReport> {
        self.report.as_ref()
    }

    /// The user-facing error from the last submission, if it failed.
    pub fn error(&self) -> Option<&'static str> {
        self.error
    }

    pub fn recent(&self) -> &RecentSearches {
        &self.recent
    }

    /// Run one lookup. On failure the previous report stays in place.
    pub async fn submit(&mut self, query: &str) -> Result<&WeatherReport, LookupError> {
        match self.service.lookup(query).await {
            Ok(report) => {
                self.error = None;
                self.remember(&report.location.name);
                Ok(&*self.report.insert(report))
            }
            Err(err) => {
                tracing::warn!(query, "Weather lookup failed: {err}");
                self.error = Some(err.user_message());
                Err(err)
            }
        }
    }

    fn remember(&mut self, name: &str) {
        self.recent = std::mem::take(&mut self.recent).record(name);
        if let Err(err) = self.recent.save(&mut self.store) {
            tracing::warn!("Failed to save recent searches: {err:#}");
        }
    }
}
