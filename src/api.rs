//! WeatherAPI.com client
//!
//! The provider reports problems as `{"error": {"code": .., "message": ..}}`
//! with any HTTP status, so every body is checked for that envelope before
//! it is decoded as a payload.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::config::AppConfig;
use crate::state::{CurrentConditions, ForecastDay, LookupFailure, WeatherAlert};

pub const DEFAULT_BASE_URL: &str = "https://api.weatherapi.com/v1";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("missing WeatherAPI key (set SKYWATCH_API_KEY)")]
    MissingApiKey,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("{message}")]
    Provider { code: Option<u32>, message: String },
    #[error("response parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    /// Flatten into the serialisable form carried by result actions
    pub fn into_failure(self) -> LookupFailure {
        match self {
            ApiError::Provider { code, message } => LookupFailure::Provider { code, message },
            other => LookupFailure::Transport(other.to_string()),
        }
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<ProviderError>,
}

#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: Option<u32>,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ConditionText {
    text: String,
    #[serde(default)]
    icon: String,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    location: LocationBody,
    current: CurrentBody,
}

#[derive(Debug, Deserialize)]
struct LocationBody {
    name: String,
    #[serde(default)]
    region: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    localtime: String,
}

#[derive(Debug, Deserialize)]
struct CurrentBody {
    temp_c: f32,
    temp_f: f32,
    #[serde(default)]
    is_day: u8,
    condition: ConditionText,
}

#[derive(Debug, Deserialize)]
struct AlertsResponse {
    #[serde(default)]
    alerts: AlertsBody,
}

#[derive(Debug, Default, Deserialize)]
struct AlertsBody {
    #[serde(default)]
    alert: Vec<AlertBody>,
}

#[derive(Debug, Deserialize)]
struct AlertBody {
    #[serde(default)]
    headline: String,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    severity: String,
    #[serde(default)]
    effective: String,
    #[serde(default)]
    expires: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    forecast: Option<ForecastBody>,
}

#[derive(Debug, Deserialize)]
struct ForecastBody {
    #[serde(default)]
    forecastday: Vec<ForecastDayBody>,
}

#[derive(Debug, Deserialize)]
struct ForecastDayBody {
    date: String,
    day: DayBody,
}

#[derive(Debug, Deserialize)]
struct DayBody {
    #[serde(default)]
    maxtemp_c: f32,
    #[serde(default)]
    mintemp_c: f32,
    maxwind_mph: f32,
    maxwind_kph: f32,
    #[serde(default)]
    daily_chance_of_rain: u8,
    condition: ConditionText,
}

impl From<CurrentResponse> for CurrentConditions {
    fn from(data: CurrentResponse) -> Self {
        CurrentConditions {
            name: data.location.name,
            region: data.location.region,
            country: data.location.country,
            temp_c: data.current.temp_c,
            temp_f: data.current.temp_f,
            condition: data.current.condition.text,
            icon: data.current.condition.icon,
            is_day: data.current.is_day == 1,
            local_time: data.location.localtime,
        }
    }
}

impl From<AlertBody> for WeatherAlert {
    fn from(alert: AlertBody) -> Self {
        WeatherAlert {
            headline: alert.headline,
            message: alert.desc.or(alert.msg).unwrap_or_default(),
            severity: alert.severity,
            effective: alert.effective,
            expires: alert.expires,
        }
    }
}

impl From<ForecastDayBody> for ForecastDay {
    fn from(day: ForecastDayBody) -> Self {
        ForecastDay {
            date: day.date,
            max_wind_mph: day.day.maxwind_mph,
            max_wind_kph: day.day.maxwind_kph,
            chance_of_rain: day.day.daily_chance_of_rain,
            condition: day.day.condition.text,
            max_temp_c: day.day.maxtemp_c,
            min_temp_c: day.day.mintemp_c,
        }
    }
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone, Debug)]
pub struct WeatherApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl WeatherApiClient {
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
        })
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, ApiError> {
        let api_key = config.api_key.clone().ok_or(ApiError::MissingApiKey)?;
        Self::new(
            api_key,
            config.base_url.clone(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// `GET /current.json`
    pub async fn current(&self, query: &str) -> Result<CurrentConditions, ApiError> {
        let data: CurrentResponse = self
            .get("current.json", &[("q", query), ("aqi", "no")])
            .await?;
        tracing::info!(location = %data.location.name, temp_c = data.current.temp_c, "conditions fetched");
        Ok(data.into())
    }

    /// `GET /alerts.json`
    pub async fn alerts(&self, query: &str) -> Result<Vec<WeatherAlert>, ApiError> {
        let data: AlertsResponse = self.get("alerts.json", &[("q", query)]).await?;
        tracing::info!(count = data.alerts.alert.len(), "alerts fetched");
        Ok(data.alerts.alert.into_iter().map(WeatherAlert::from).collect())
    }

    /// `GET /forecast.json`; a payload without a forecast block yields no days.
    pub async fn forecast(&self, query: &str, days: u8) -> Result<Vec<ForecastDay>, ApiError> {
        let days = days.to_string();
        let data: ForecastResponse = self
            .get(
                "forecast.json",
                &[("q", query), ("days", days.as_str()), ("aqi", "no"), ("alerts", "no")],
            )
            .await?;
        let days: Vec<ForecastDay> = data
            .forecast
            .map(|f| f.forecastday.into_iter().map(ForecastDay::from).collect())
            .unwrap_or_default();
        tracing::info!(count = days.len(), "forecast fetched");
        Ok(days)
    }

    async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<T, ApiError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(%endpoint, "requesting provider");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;
        tracing::debug!(%endpoint, %status, bytes = body.len(), "provider responded");

        decode(&body)
    }
}

/// Decode a provider body, surfacing its error envelope first.
pub fn decode<T: DeserializeOwned>(body: &[u8]) -> Result<T, ApiError> {
    let envelope: ErrorEnvelope = serde_json::from_slice(body)?;
    if let Some(error) = envelope.error {
        return Err(ApiError::Provider {
            code: error.code,
            message: error.message,
        });
    }
    Ok(serde_json::from_slice(body)?)
}
