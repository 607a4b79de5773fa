use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;

use crate::{
    config::Config,
    error::LookupError,
    model::GeoLocation,
    provider::{CurrentConditions, DailyConditions, Forecast},
};

use super::{Geocoder, WeatherProvider};

pub const DEFAULT_GEOCODING_URL: &str = "https://geocoding-api.open-meteo.com/v1/search";
pub const DEFAULT_FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

const USER_AGENT: &str = concat!("weather-cli/", env!("CARGO_PKG_VERSION"));

const CURRENT_FIELDS: &str = "temperature_2m,apparent_temperature,relative_humidity_2m,\
                              weather_code,wind_speed_10m,precipitation,cloud_cover";
const DAILY_FIELDS: &str =
    "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum,sunrise,sunset";

/// Open-Meteo geocoding and forecast APIs. Neither needs an API key.
#[derive(Debug, Clone)]
pub struct OpenMeteo {
    http: Client,
    geocoding_url: String,
    forecast_url: String,
}

impl OpenMeteo {
    pub fn new(http: Client, geocoding_url: String, forecast_url: String) -> Self {
        Self { http, geocoding_url, forecast_url }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs()))
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self::new(
            http,
            config.geocoding_url().to_string(),
            config.forecast_url().to_string(),
        ))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        service: &'static str,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, LookupError> {
        tracing::debug!(service, url, "Sending request");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|source| LookupError::Request { service, source })?;

        let status = res.status();
        let body = res.text().await.map_err(|source| LookupError::Request { service, source })?;

        if !status.is_success() {
            return Err(LookupError::Status { service, status, body: truncate_body(&body) });
        }

        serde_json::from_str(&body).map_err(|source| LookupError::Decode { service, source })
    }
}

#[derive(Debug, Deserialize)]
struct OmGeocodeResponse {
    // The field is absent when nothing matched.
    #[serde(default)]
    results: Vec<OmPlace>,
}

#[derive(Debug, Deserialize)]
struct OmPlace {
    name: String,
    latitude: f64,
    longitude: f64,
    admin1: Option<String>,
    country: Option<String>,
    timezone: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    current: OmCurrent,
    daily: Option<OmDaily>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    time: String,
    temperature_2m: f64,
    apparent_temperature: f64,
    relative_humidity_2m: f64,
    weather_code: i32,
    wind_speed_10m: f64,
    precipitation: f64,
    cloud_cover: f64,
}

#[derive(Debug, Deserialize)]
struct OmDaily {
    time: Vec<String>,
    weather_code: Vec<Option<i32>>,
    temperature_2m_max: Vec<f64>,
    temperature_2m_min: Vec<f64>,
    #[serde(default)]
    precipitation_sum: Vec<Option<f64>>,
    #[serde(default)]
    sunrise: Vec<Option<String>>,
    #[serde(default)]
    sunset: Vec<Option<String>>,
}

#[async_trait]
impl Geocoder for OpenMeteo {
    async fn geocode(&self, query: &str) -> Result<GeoLocation, LookupError> {
        let parsed: OmGeocodeResponse = self
            .get_json(
                "geocoding",
                &self.geocoding_url,
                &[
                    ("name", query.to_string()),
                    ("count", "1".to_string()),
                    ("language", "en".to_string()),
                    ("format", "json".to_string()),
                ],
            )
            .await?;

        let place = parsed
            .results
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NotFound(query.to_string()))?;

        let location = GeoLocation {
            name: GeoLocation::format_name(
                &place.name,
                place.admin1.as_deref(),
                place.country.as_deref(),
            ),
            latitude: place.latitude,
            longitude: place.longitude,
            timezone: place.timezone,
        };

        tracing::info!(
            query,
            name = %location.name,
            lat = location.latitude,
            lon = location.longitude,
            "Resolved location"
        );

        Ok(location)
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteo {
    async fn forecast(&self, location: &GeoLocation, days: u8) -> Result<Forecast, LookupError> {
        let parsed: OmForecastResponse = self
            .get_json(
                "forecast",
                &self.forecast_url,
                &[
                    ("latitude", location.latitude.to_string()),
                    ("longitude", location.longitude.to_string()),
                    ("current", CURRENT_FIELDS.to_string()),
                    ("daily", DAILY_FIELDS.to_string()),
                    ("timezone", "auto".to_string()),
                    ("forecast_days", days.to_string()),
                ],
            )
            .await?;

        let current = CurrentConditions {
            observed_at: parse_local_datetime(&parsed.current.time)?,
            weather_code: parsed.current.weather_code,
            temperature_c: parsed.current.temperature_2m,
            feels_like_c: parsed.current.apparent_temperature,
            humidity_pct: percent(parsed.current.relative_humidity_2m),
            wind_speed_kmh: parsed.current.wind_speed_10m,
            precipitation_mm: parsed.current.precipitation,
            cloud_cover_pct: percent(parsed.current.cloud_cover),
        };

        let daily = match parsed.daily {
            Some(daily) => daily_conditions(daily)?,
            None => Vec::new(),
        };

        Ok(Forecast { current, daily })
    }
}

fn daily_conditions(daily: OmDaily) -> Result<Vec<DailyConditions>, LookupError> {
    let n = daily.time.len();
    if daily.weather_code.len() != n
        || daily.temperature_2m_max.len() != n
        || daily.temperature_2m_min.len() != n
    {
        return Err(malformed("daily series have different lengths"));
    }

    let mut out = Vec::with_capacity(n);
    for (i, date) in daily.time.iter().enumerate() {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map_err(|_| malformed(format!("invalid date '{date}'")))?;

        let sunrise = daily.sunrise.get(i).cloned().flatten();
        let sunset = daily.sunset.get(i).cloned().flatten();

        out.push(DailyConditions {
            date,
            weather_code: daily.weather_code[i].unwrap_or_default(),
            min_temp_c: daily.temperature_2m_min[i],
            max_temp_c: daily.temperature_2m_max[i],
            precipitation_mm: daily.precipitation_sum.get(i).copied().flatten().unwrap_or(0.0),
            sunrise: sunrise.as_deref().map(parse_local_datetime).transpose()?,
            sunset: sunset.as_deref().map(parse_local_datetime).transpose()?,
        });
    }

    Ok(out)
}

/// Open-Meteo sends ISO-8601 local times without seconds, e.g. `2024-06-01T14:15`.
fn parse_local_datetime(s: &str) -> Result<NaiveDateTime, LookupError> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .map_err(|_| malformed(format!("invalid timestamp '{s}'")))
}

fn percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn malformed(reason: impl Into<String>) -> LookupError {
    LookupError::Malformed { service: "forecast", reason: reason.into() }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn client(server: &MockServer) -> OpenMeteo {
        OpenMeteo::new(
            Client::new(),
            format!("{}/v1/search", server.uri()),
            format!("{}/v1/forecast", server.uri()),
        )
    }

    fn paris() -> GeoLocation {
        GeoLocation {
            name: "Paris, Île-de-France, France".into(),
            latitude: 48.85341,
            longitude: 2.3488,
            timezone: Some("Europe/Paris".into()),
        }
    }

    fn forecast_body() -> serde_json::Value {
        json!({
            "latitude": 48.86,
            "longitude": 2.34,
            "timezone": "Europe/Paris",
            "current": {
                "time": "2024-06-01T14:15",
                "interval": 900,
                "temperature_2m": 24.3,
                "apparent_temperature": 25.1,
                "relative_humidity_2m": 48,
                "weather_code": 2,
                "wind_speed_10m": 11.2,
                "precipitation": 0.0,
                "cloud_cover": 35
            },
            "daily": {
                "time": ["2024-06-01", "2024-06-02"],
                "weather_code": [2, 63],
                "temperature_2m_max": [26.0, 19.5],
                "temperature_2m_min": [14.2, 12.8],
                "precipitation_sum": [0.0, null],
                "sunrise": ["2024-06-01T05:49", "2024-06-02T05:48"],
                "sunset": ["2024-06-01T21:48", "2024-06-02T21:49"]
            }
        })
    }

    #[tokio::test]
    async fn geocode_picks_first_candidate() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Paris"))
            .and(query_param("count", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [{
                    "id": 2988507,
                    "name": "Paris",
                    "latitude": 48.85341,
                    "longitude": 2.3488,
                    "country": "France",
                    "admin1": "Île-de-France",
                    "timezone": "Europe/Paris"
                }],
                "generationtime_ms": 0.5
            })))
            .mount(&server)
            .await;

        let location = client(&server).geocode("Paris").await.expect("geocode");
        assert_eq!(location, paris());
    }

    #[tokio::test]
    async fn geocode_without_results_is_not_found() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"generationtime_ms": 0.3})))
            .mount(&server)
            .await;

        let err = client(&server).geocode("Nowhereville").await.unwrap_err();
        assert!(matches!(err, LookupError::NotFound(ref q) if q == "Nowhereville"));
    }

    #[tokio::test]
    async fn geocode_server_error_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let err = client(&server).geocode("Paris").await.unwrap_err();
        assert!(matches!(err, LookupError::Status { service: "geocoding", .. }));
    }

    #[tokio::test]
    async fn forecast_parses_current_and_daily() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .and(query_param("latitude", "48.85341"))
            .and(query_param("timezone", "auto"))
            .and(query_param("forecast_days", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let forecast = client(&server).forecast(&paris(), 2).await.expect("forecast");

        assert_eq!(forecast.current.weather_code, 2);
        assert_eq!(forecast.current.humidity_pct, 48);
        assert_eq!(forecast.current.cloud_cover_pct, 35);
        assert_eq!(forecast.current.observed_at.to_string(), "2024-06-01 14:15:00");

        assert_eq!(forecast.daily.len(), 2);
        let second = &forecast.daily[1];
        assert_eq!(second.weather_code, 63);
        assert_eq!(second.precipitation_mm, 0.0);
        assert_eq!(second.sunset.map(|t| t.to_string()).as_deref(), Some("2024-06-02 21:49:00"));
    }

    #[tokio::test]
    async fn forecast_with_mismatched_daily_arrays_is_malformed() {
        let mut body = forecast_body();
        body["daily"]["temperature_2m_max"] = json!([26.0]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = client(&server).forecast(&paris(), 2).await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed { .. }));
    }

    #[tokio::test]
    async fn forecast_with_invalid_json_is_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let err = client(&server).forecast(&paris(), 2).await.unwrap_err();
        assert!(matches!(err, LookupError::Decode { service: "forecast", .. }));
    }

    #[tokio::test]
    async fn forecast_with_unparsable_time_is_malformed() {
        let mut body = forecast_body();
        body["current"]["time"] = json!("yesterday");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = client(&server).forecast(&paris(), 2).await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed { ref reason, .. } if reason.contains("yesterday")));
    }

    #[tokio::test]
    async fn forecast_with_unparsable_sunrise_is_malformed() {
        let mut body = forecast_body();
        body["daily"]["sunrise"] = json!(["dawn", "2024-06-02T05:48"]);

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&server)
            .await;

        let err = client(&server).forecast(&paris(), 2).await.unwrap_err();
        assert!(matches!(err, LookupError::Malformed { .. }));
    }

    #[tokio::test]
    async fn client_from_config_uses_overrides() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1/forecast"))
            .respond_with(ResponseTemplate::new(200).set_body_json(forecast_body()))
            .mount(&server)
            .await;

        let config = Config {
            timeout_secs: 0,
            forecast_url: Some(format!("{}/v1/forecast", server.uri())),
            ..Config::default()
        };

        let forecast = OpenMeteo::from_config(&config)
            .expect("client builds")
            .forecast(&paris(), 2)
            .await
            .expect("zero timeout is raised to the minimum");
        assert_eq!(forecast.daily.len(), 2);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let long = "é".repeat(300);
        let out = truncate_body(&long);
        assert!(out.ends_with("..."));
        assert_eq!(out.chars().count(), 203);
    }
}
