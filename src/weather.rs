use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt;

use crate::types::{GeoPoint, WindStrength};
use crate::wind::wind_category;

pub const DEFAULT_BASE_URL: &str = "http://api.weatherapi.com/v1";
pub const DEFAULT_LANG: &str = "fr";
// Returned by the API when the requested history date is outside the plan.
pub const HISTORY_UNAVAILABLE_CODE: i64 = 1006;

#[derive(Clone, Debug, Deserialize)]
pub struct WeatherConfig {
    pub api_key: Option<String>,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_lang")]
    pub lang: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_lang() -> String {
    DEFAULT_LANG.to_string()
}

impl WeatherConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        WeatherConfig {
            api_key: Some(api_key.into()),
            base_url: default_base_url(),
            lang: default_lang(),
        }
    }
}

#[derive(Debug)]
pub enum WeatherError {
    MissingApiKey,
    Http(reqwest::Error),
    Api { code: i64, message: String },
    HistoryUnavailable { date: String },
    Decode(serde_json::Error),
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::MissingApiKey => write!(f, "weather API key is not set"),
            WeatherError::Http(e) => write!(f, "weather request failed: {}", e),
            WeatherError::Api { code, message } => write!(f, "weather API error {}: {}", code, message),
            WeatherError::HistoryUnavailable { date } => write!(f, "weather history unavailable for {}", date),
            WeatherError::Decode(e) => write!(f, "invalid weather response: {}", e),
        }
    }
}

impl Error for WeatherError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WeatherError::Http(e) => Some(e),
            WeatherError::Decode(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(e: reqwest::Error) -> Self {
        WeatherError::Http(e)
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(e: serde_json::Error) -> Self {
        WeatherError::Decode(e)
    }
}

// ** Reports handed back to the app **

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct WeatherReport {
    pub temperature_c: f64,
    pub conditions: String,
    pub wind_speed_kmh: f64,
    pub wind_direction: String,
    pub pressure_mb: f64,
    pub wind_strength: WindStrength,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DailyWeather {
    pub avg_temp_c: f64,
    pub conditions: String,
    pub max_wind_kmh: f64,
    pub wind_strength: WindStrength,
}

// ** API payloads (only used here) **

#[derive(Deserialize)]
struct Condition {
    text: String,
}

#[derive(Deserialize)]
struct Current {
    temp_c: f64,
    condition: Condition,
    wind_kph: f64,
    wind_dir: String,
    pressure_mb: f64,
}

#[derive(Deserialize)]
struct CurrentResponse {
    current: Current,
}

#[derive(Deserialize)]
struct Day {
    avgtemp_c: f64,
    condition: Condition,
    maxwind_kph: f64,
}

#[derive(Deserialize)]
struct ForecastDay {
    day: Day,
}

#[derive(Deserialize)]
struct Forecast {
    forecastday: Vec<ForecastDay>,
}

#[derive(Deserialize)]
struct HistoryResponse {
    forecast: Forecast,
}

#[derive(Deserialize)]
struct ApiErrorBody {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct ApiErrorResponse {
    error: ApiErrorBody,
}

pub fn parse_current(body: &str) -> Result<WeatherReport, WeatherError> {
    let current = serde_json::from_str::<CurrentResponse>(body)?.current;
    Ok(WeatherReport {
        temperature_c: current.temp_c,
        conditions: current.condition.text,
        wind_speed_kmh: current.wind_kph,
        wind_direction: current.wind_dir,
        pressure_mb: current.pressure_mb,
        wind_strength: wind_category(current.wind_kph),
    })
}

pub fn parse_history(body: &str) -> Result<DailyWeather, WeatherError> {
    let history: HistoryResponse = serde_json::from_str(body)?;
    let day = history
        .forecast
        .forecastday
        .into_iter()
        .next()
        .ok_or_else(|| <serde_json::Error as serde::de::Error>::custom("empty forecastday"))?
        .day;
    Ok(DailyWeather {
        avg_temp_c: day.avgtemp_c,
        conditions: day.condition.text,
        max_wind_kmh: day.maxwind_kph,
        wind_strength: wind_category(day.maxwind_kph),
    })
}

pub fn parse_api_error(body: &str) -> WeatherError {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(response) => WeatherError::Api {
            code: response.error.code,
            message: response.error.message,
        },
        Err(e) => WeatherError::Decode(e),
    }
}

// Code 1006 on a history request means the date is outside the plan, which a backfill skips.
pub fn history_error(err: WeatherError, date: &str) -> WeatherError {
    match err {
        WeatherError::Api { code, .. } if code == HISTORY_UNAVAILABLE_CODE => {
            log::warn!("Weather history for {} is not available on this plan", date);
            WeatherError::HistoryUnavailable { date: date.to_string() }
        }
        other => other,
    }
}

pub struct WeatherClient {
    config: WeatherConfig,
    client: Client,
}

impl WeatherClient {
    pub fn new(config: WeatherConfig) -> Self {
        WeatherClient {
            config,
            client: Client::new(),
        }
    }

    async fn fetch(&self, endpoint: &str, location: &GeoPoint, date: Option<&str>) -> Result<String, WeatherError> {
        let api_key = self.config.api_key.as_deref().ok_or(WeatherError::MissingApiKey)?;
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let coordinates = format!("{},{}", location.latitude, location.longitude);

        let mut query = vec![("key", api_key), ("q", coordinates.as_str()), ("lang", self.config.lang.as_str())];
        if let Some(date) = date {
            query.push(("dt", date));
        }

        log::info!("Fetching {} for {}", endpoint, coordinates);
        let response = self.client.get(&url).query(&query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let error = parse_api_error(&body);
            log::error!("Weather API returned {}: {}", status, error);
            return Err(error);
        }
        Ok(body)
    }

    pub async fn current(&self, location: &GeoPoint) -> Result<WeatherReport, WeatherError> {
        let body = self.fetch("current.json", location, None).await?;
        parse_current(&body)
    }

    // Weather of a past day, `date` formatted as YYYY-MM-DD.
    pub async fn history(&self, location: &GeoPoint, date: &str) -> Result<DailyWeather, WeatherError> {
        let body = self
            .fetch("history.json", location, Some(date))
            .await
            .map_err(|e| history_error(e, date))?;
        parse_history(&body)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WeatherIcon {
    Sunny,
    Cloudy,
    Rainy,
    Snow,
    Thunderstorm,
    Cloud,
}

impl WeatherIcon {
    pub fn from_conditions(conditions: Option<&str>) -> Self {
        let conditions = match conditions {
            Some(text) => text.to_lowercase(),
            None => return WeatherIcon::Cloud,
        };
        if conditions.contains("soleil") || conditions.contains("clair") {
            WeatherIcon::Sunny
        } else if conditions.contains("nuageux") {
            WeatherIcon::Cloudy
        } else if conditions.contains("pluie") {
            WeatherIcon::Rainy
        } else if conditions.contains("neige") {
            WeatherIcon::Snow
        } else if conditions.contains("orage") {
            WeatherIcon::Thunderstorm
        } else {
            WeatherIcon::Cloud
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WeatherIcon::Sunny => "sunny",
            WeatherIcon::Cloudy => "cloudy",
            WeatherIcon::Rainy => "rainy",
            WeatherIcon::Snow => "snow",
            WeatherIcon::Thunderstorm => "thunderstorm",
            WeatherIcon::Cloud => "cloud",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CURRENT: &str = r#"{
        "location": {"name": "Annecy"},
        "current": {
            "temp_c": 18.5,
            "condition": {"text": "Partiellement nuageux", "code": 1003},
            "wind_kph": 22.3,
            "wind_dir": "NNE",
            "pressure_mb": 1016.0
        }
    }"#;

    const HISTORY: &str = r#"{
        "forecast": {"forecastday": [{"date": "2024-05-01", "day": {
            "avgtemp_c": 12.1,
            "maxwind_kph": 4.0,
            "condition": {"text": "Ensoleillé"}
        }}]}
    }"#;

    #[test]
    fn test_parse_current() {
        let report = parse_current(CURRENT).unwrap();
        assert_eq!(report.temperature_c, 18.5);
        assert_eq!(report.conditions, "Partiellement nuageux");
        assert_eq!(report.wind_direction, "NNE");
        assert_eq!(report.wind_strength, WindStrength::Moderate);
    }

    #[test]
    fn test_parse_history() {
        let day = parse_history(HISTORY).unwrap();
        assert_eq!(day.avg_temp_c, 12.1);
        assert_eq!(day.max_wind_kmh, 4.0);
        assert_eq!(day.wind_strength, WindStrength::Calm);

        let empty = parse_history(r#"{"forecast": {"forecastday": []}}"#);
        assert!(matches!(empty, Err(WeatherError::Decode(_))));
    }

    #[test]
    fn test_parse_invalid_body() {
        assert!(matches!(parse_current("{}"), Err(WeatherError::Decode(_))));
    }

    #[test]
    fn test_parse_api_error() {
        let error = parse_api_error(r#"{"error": {"code": 1006, "message": "No matching location found."}}"#);
        match error {
            WeatherError::Api { code, message } => {
                assert_eq!(code, HISTORY_UNAVAILABLE_CODE);
                assert_eq!(message, "No matching location found.");
            }
            other => panic!("unexpected error {:?}", other),
        }
        assert!(matches!(parse_api_error("Bad gateway"), WeatherError::Decode(_)));
    }

    #[test]
    fn test_history_error_unavailable_date() {
        let error = history_error(
            WeatherError::Api {
                code: HISTORY_UNAVAILABLE_CODE,
                message: "API key does not have access to this date".to_string(),
            },
            "2020-01-01",
        );
        match error {
            WeatherError::HistoryUnavailable { date } => assert_eq!(date, "2020-01-01"),
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[test]
    fn test_history_error_keeps_other_errors() {
        let error = history_error(
            WeatherError::Api {
                code: 2006,
                message: "API key is invalid.".to_string(),
            },
            "2020-01-01",
        );
        assert!(matches!(error, WeatherError::Api { code: 2006, .. }));
        assert!(matches!(history_error(WeatherError::MissingApiKey, "2020-01-01"), WeatherError::MissingApiKey));
    }

    #[test]
    fn test_missing_api_key() {
        let config: WeatherConfig = serde_json::from_str("{}").unwrap();
        let client = WeatherClient::new(config);
        let location = GeoPoint::new(45.9, 6.12);

        let current = futures::executor::block_on(client.current(&location));
        assert!(matches!(current, Err(WeatherError::MissingApiKey)));
        let history = futures::executor::block_on(client.history(&location, "2024-05-01"));
        assert!(matches!(history, Err(WeatherError::MissingApiKey)));
    }

    #[test]
    fn test_config_defaults() {
        let config: WeatherConfig = serde_json::from_str(r#"{"api_key": "secret"}"#).unwrap();
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.lang, DEFAULT_LANG);
    }

    #[test]
    fn test_icons() {
        assert_eq!(WeatherIcon::from_conditions(None), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::from_conditions(Some("Ciel clair")), WeatherIcon::Sunny);
        assert_eq!(WeatherIcon::from_conditions(Some("Partiellement nuageux")), WeatherIcon::Cloudy);
        assert_eq!(WeatherIcon::from_conditions(Some("Pluie modérée")), WeatherIcon::Rainy);
        assert_eq!(WeatherIcon::from_conditions(Some("NEIGE")), WeatherIcon::Snow);
        assert_eq!(WeatherIcon::from_conditions(Some("Orage")), WeatherIcon::Thunderstorm);
        assert_eq!(WeatherIcon::from_conditions(Some("Brouillard")), WeatherIcon::Cloud);
        assert_eq!(WeatherIcon::Thunderstorm.as_str(), "thunderstorm");
        assert_eq!(
            serde_json::to_value(WeatherIcon::Sunny).unwrap(),
            WeatherIcon::Sunny.as_str()
        );
    }
}
