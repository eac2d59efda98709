use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::{
    config::{Config, ENV_API_URL},
    error::ProviderError,
    model::Conditions,
};

use super::WeatherProvider;

const UNITS: &str = "standard";
const MODE: &str = "json";
const LANG: &str = "en";

/// Forecast endpoint reached through RapidAPI; the first forecast entry is taken as current.
#[derive(Debug, Clone)]
pub struct RapidApiProvider {
    api_key: Option<String>,
    api_host: Option<String>,
    api_url: Option<String>,
    http: Client,
}

impl RapidApiProvider {
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ProviderError::Config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            api_host: config.api_host.clone(),
            api_url: config.api_url.clone(),
            http,
        })
    }
}

#[async_trait]
impl WeatherProvider for RapidApiProvider {
    #[instrument(skip(self))]
    async fn current_conditions(&self, city: &str) -> Result<Conditions, ProviderError> {
        let url = self
            .api_url
            .as_deref()
            .ok_or_else(|| ProviderError::Config(format!("{ENV_API_URL} is not configured")))?;

        let mut req = self.http.get(url).query(&[
            ("place", city),
            ("units", UNITS),
            ("mode", MODE),
            ("lang", LANG),
        ]);
        if let Some(key) = &self.api_key {
            req = req.header("X-RapidAPI-Key", key);
        }
        if let Some(host) = &self.api_host {
            req = req.header("X-RapidAPI-Host", host);
        }

        let res = req.send().await?;

        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Upstream returned an error status");
            return Err(ProviderError::Http {
                status: status.as_u16(),
                text: body,
            });
        }

        info!(payload = %body, "Weather data received");

        let parsed: RaForecastResponse =
            serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))?;

        Ok(parsed.into_current())
    }
}

#[derive(Debug, Default, Deserialize)]
struct RaMain {
    // Field names follow the provider's schema, misspelling included. Leaves stay untyped so an
    // unexpected value type is echoed rather than failing the whole payload.
    #[serde(rename = "temprature")]
    temperature: Option<Value>,
    #[serde(rename = "temprature_feels_like")]
    feels_like: Option<Value>,
    humidity: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RaWeather {
    description: Option<Value>,
    icon: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RaWind {
    speed: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RaForecastEntry {
    main: Option<RaMain>,
    weather: Option<Vec<RaWeather>>,
    wind: Option<RaWind>,
}

#[derive(Debug, Default, Deserialize)]
struct RaForecastResponse {
    list: Option<Vec<RaForecastEntry>>,
}

impl RaForecastResponse {
    /// Reshape the first forecast entry; an absent or empty list yields empty conditions.
    fn into_current(self) -> Conditions {
        let entry = self
            .list
            .and_then(|list| list.into_iter().next())
            .unwrap_or_default();

        let main = entry.main.unwrap_or_default();
        let weather = entry
            .weather
            .and_then(|w| w.into_iter().next())
            .unwrap_or_default();
        let wind = entry.wind.unwrap_or_default();

        Conditions {
            temperature: main.temperature,
            feels_like: main.feels_like,
            description: weather.description,
            icon: weather.icon,
            humidity: main.humidity,
            wind_speed: wind.speed,
        }
    }
}
