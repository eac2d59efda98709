use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{error::HandlerError, model::WeatherReport};

/// Headers attached to every response, success or failure.
pub const CORS_HEADERS: [(&str, &str); 4] = [
    ("Content-Type", "application/json"),
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET,POST,OPTIONS"),
    (
        "Access-Control-Allow-Headers",
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token",
    ),
];

// Used only if serializing a response body ever fails.
const FALLBACK_BODY: &str = r#"{"error":"Internal server error."}"#;

/// Outbound response: status code, fixed header set and a serialized JSON body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ProxyResponse {
    pub fn json<T: Serialize>(status_code: u16, payload: &T) -> Self {
        match serde_json::to_string(payload) {
            Ok(body) => Self::raw(status_code, body),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize response body");
                Self::raw(500, FALLBACK_BODY.to_string())
            }
        }
    }

    pub fn ok(report: &WeatherReport) -> Self {
        Self::json(200, report)
    }

    pub fn from_error(err: &HandlerError) -> Self {
        Self::json(err.status_code(), &err.to_body())
    }

    fn raw(status_code: u16, body: String) -> Self {
        let headers = CORS_HEADERS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();

        Self {
            status_code,
            headers,
            body,
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }
}
