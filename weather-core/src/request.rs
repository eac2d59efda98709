use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;

use crate::error::HandlerError;

/// Inbound HTTP-style invocation, in API Gateway proxy-event field naming.
///
/// Only the fields the handler reads are modelled; everything else in the event is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyRequest {
    #[serde(default)]
    pub body: Option<String>,

    #[serde(default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

impl ProxyRequest {
    pub fn with_body(body: impl Into<String>) -> Self {
        Self {
            body: Some(body.into()),
            ..Self::default()
        }
    }

    pub fn with_query_city(city: impl Into<String>) -> Self {
        let params = HashMap::from([("city".to_string(), city.into())]);
        Self {
            query_string_parameters: Some(params),
            ..Self::default()
        }
    }

    /// Pull the requested city out of the body, falling back to query parameters.
    ///
    /// An empty body or an empty parameter map counts as absent.
    pub fn city(&self) -> Result<String, HandlerError> {
        let city = if let Some(body) = self.body.as_deref().filter(|b| !b.is_empty()) {
            let fields: Map<String, Value> =
                serde_json::from_str(body).map_err(|_| HandlerError::InvalidBody)?;

            match fields.get("city") {
                Some(Value::String(city)) => Some(city.clone()),
                _ => None,
            }
        } else if let Some(params) = self.query_string_parameters.as_ref().filter(|p| !p.is_empty())
        {
            params.get("city").cloned()
        } else {
            return Err(HandlerError::MissingCity);
        };

        city.filter(|c| !c.is_empty()).ok_or(HandlerError::EmptyCity)
    }
}
