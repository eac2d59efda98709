use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current conditions as reported by a provider, already detached from its raw schema.
///
/// Every field is optional: a provider that omits a value yields `None` rather than an error.
/// Values are kept exactly as the provider sent them, whatever their JSON type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Conditions {
    pub temperature: Option<Value>,
    pub feels_like: Option<Value>,
    pub description: Option<Value>,
    pub icon: Option<Value>,
    pub humidity: Option<Value>,
    pub wind_speed: Option<Value>,
}

/// Caller-facing weather result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    /// Echo of the requested city; the provider does not return one.
    pub city: String,
    /// Always `None`: the provider does not supply a country.
    pub country: Option<String>,
    pub temperature: Option<Value>,
    pub feels_like: Option<Value>,
    pub description: Option<Value>,
    pub icon: Option<Value>,
    pub humidity: Option<Value>,
    pub wind_speed: Option<Value>,
    pub timestamp: DateTime<Utc>,
}

impl WeatherReport {
    pub fn new(city: impl Into<String>, conditions: Conditions, timestamp: DateTime<Utc>) -> Self {
        let Conditions {
            temperature,
            feels_like,
            description,
            icon,
            humidity,
            wind_speed,
        } = conditions;

        Self {
            city: city.into(),
            country: None,
            temperature,
            feels_like,
            description,
            icon,
            humidity,
            wind_speed,
            timestamp,
        }
    }
}
