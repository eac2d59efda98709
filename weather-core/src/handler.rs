use chrono::Utc;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::{
    Config, ProxyRequest, ProxyResponse, WeatherReport,
    error::{HandlerError, ProviderError},
    provider::{WeatherProvider, provider_from_config},
};

/// Turns one inbound request into one response by way of a single upstream lookup.
///
/// Holds no per-request state; a single instance serves any number of invocations.
#[derive(Debug)]
pub struct WeatherHandler {
    provider: Box<dyn WeatherProvider>,
}

impl WeatherHandler {
    pub fn new(provider: Box<dyn WeatherProvider>) -> Self {
        Self { provider }
    }

    pub fn from_config(config: &Config) -> Result<Self, ProviderError> {
        Ok(Self::new(provider_from_config(config)?))
    }

    /// Handle a raw proxy event. An event that does not have the expected shape still gets a
    /// well-formed 500 response.
    pub async fn handle_event(&self, event: Value) -> ProxyResponse {
        match serde_json::from_value::<ProxyRequest>(event) {
            Ok(request) => self.handle(&request).await,
            Err(e) => {
                let err = HandlerError::Internal(format!("malformed invocation event: {e}"));
                error!(error = %e, "Could not read invocation event");
                ProxyResponse::from_error(&err)
            }
        }
    }

    pub async fn handle(&self, request: &ProxyRequest) -> ProxyResponse {
        info!(
            has_body = request.body.is_some(),
            has_query = request.query_string_parameters.is_some(),
            "Received weather request"
        );

        match self.lookup(request).await {
            Ok(report) => ProxyResponse::ok(&report),
            Err(err) => {
                if err.is_client_error() {
                    warn!(status = err.status_code(), error = ?err, "Weather request failed");
                } else {
                    error!(status = err.status_code(), error = ?err, "Weather request failed");
                }
                ProxyResponse::from_error(&err)
            }
        }
    }

    async fn lookup(&self, request: &ProxyRequest) -> Result<WeatherReport, HandlerError> {
        let city = request.city()?;
        info!(city = %city, "Fetching weather for city");

        let conditions = self.provider.current_conditions(&city).await?;

        Ok(WeatherReport::new(city, conditions, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Conditions, response::CORS_HEADERS};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    enum Reply {
        Conditions(Conditions),
        Http(u16, &'static str),
        Timeout,
        Connection,
        Decode,
    }

    #[derive(Debug)]
    struct StubProvider {
        reply: Reply,
        seen: Arc<Mutex<Vec<String>>>,
    }

    impl StubProvider {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                seen: Arc::default(),
            }
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current_conditions(&self, city: &str) -> Result<Conditions, ProviderError> {
            self.seen.lock().unwrap().push(city.to_string());
            match &self.reply {
                Reply::Conditions(c) => Ok(c.clone()),
                Reply::Http(status, text) => Err(ProviderError::Http {
                    status: *status,
                    text: text.to_string(),
                }),
                Reply::Timeout => Err(ProviderError::Timeout("operation timed out".into())),
                Reply::Connection => Err(ProviderError::Connection("connection refused".into())),
                Reply::Decode => Err(ProviderError::Decode("expected value at line 1".into())),
            }
        }
    }

    fn handler(reply: Reply) -> WeatherHandler {
        WeatherHandler::new(Box::new(StubProvider::new(reply)))
    }

    fn sunny() -> Conditions {
        Conditions {
            temperature: Some(json!(293.15)),
            feels_like: Some(json!(292.4)),
            description: Some(json!("clear sky")),
            icon: Some(json!("01d")),
            humidity: Some(json!(40)),
            wind_speed: Some(json!(3.1)),
        }
    }

    fn body(resp: &ProxyResponse) -> Value {
        serde_json::from_str(&resp.body).expect("json body")
    }

    fn assert_cors(resp: &ProxyResponse) {
        for (name, value) in CORS_HEADERS {
            assert_eq!(resp.header(name), Some(value), "header {name}");
        }
    }

    #[tokio::test]
    async fn success_echoes_city_and_reshapes_conditions() {
        let h = handler(Reply::Conditions(sunny()));

        let resp = h.handle(&ProxyRequest::with_body(r#"{"city": "São Paulo"}"#)).await;

        assert_eq!(resp.status_code, 200);
        assert_cors(&resp);
        let body = body(&resp);
        assert_eq!(body["city"], json!("São Paulo"));
        assert_eq!(body["country"], json!(null));
        assert_eq!(body["temperature"], json!(293.15));
        assert_eq!(body["description"], json!("clear sky"));
        assert_eq!(body["icon"], json!("01d"));
        assert_eq!(body["humidity"], json!(40));
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn query_city_is_passed_to_provider_verbatim() {
        let stub = StubProvider::new(Reply::Conditions(Conditions::default()));
        let seen = Arc::clone(&stub.seen);
        let h = WeatherHandler::new(Box::new(stub));

        let resp = h.handle(&ProxyRequest::with_query_city("  New York ")).await;

        assert_eq!(resp.status_code, 200);
        assert_eq!(body(&resp)["city"], json!("  New York "));
        assert_eq!(*seen.lock().unwrap(), vec!["  New York ".to_string()]);
    }

    #[tokio::test]
    async fn empty_conditions_give_nulls_not_errors() {
        let h = handler(Reply::Conditions(Conditions::default()));

        let resp = h.handle(&ProxyRequest::with_query_city("Nowhere")).await;

        assert_eq!(resp.status_code, 200);
        let body = body(&resp);
        for field in [
            "temperature",
            "feels_like",
            "description",
            "icon",
            "humidity",
            "wind_speed",
        ] {
            assert_eq!(body[field], json!(null), "field {field}");
        }
    }

    #[tokio::test]
    async fn missing_input_is_bad_request() {
        let h = handler(Reply::Conditions(sunny()));

        let resp = h.handle(&ProxyRequest::default()).await;

        assert_eq!(resp.status_code, 400);
        assert_cors(&resp);
        let error = body(&resp)["error"].as_str().unwrap().to_string();
        assert!(error.contains("City parameter missing"));
    }

    #[tokio::test]
    async fn empty_city_is_bad_request_and_skips_upstream() {
        let stub = StubProvider::new(Reply::Conditions(sunny()));
        let seen = Arc::clone(&stub.seen);
        let h = WeatherHandler::new(Box::new(stub));

        let resp = h.handle(&ProxyRequest::with_body(r#"{"city": ""}"#)).await;

        assert_eq!(resp.status_code, 400);
        assert_eq!(body(&resp)["error"], json!("City parameter is required."));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn truncated_body_is_invalid_json() {
        let h = handler(Reply::Conditions(sunny()));

        let resp = h.handle(&ProxyRequest::with_body(r#"{"city": "Ber"#)).await;

        assert_eq!(resp.status_code, 400);
        assert_cors(&resp);
        assert_eq!(body(&resp)["error"], json!("Invalid JSON in request body."));
    }

    #[tokio::test]
    async fn upstream_status_is_passed_through_with_details() {
        let h = handler(Reply::Http(404, r#"{"message":"city not found"}"#));

        let resp = h.handle(&ProxyRequest::with_query_city("Atlantis")).await;

        assert_eq!(resp.status_code, 404);
        assert_cors(&resp);
        let body = body(&resp);
        assert_eq!(body["error"], json!("Failed to fetch weather data from external API."));
        let details = body["details"].as_str().unwrap();
        assert!(details.contains(r#"{"message":"city not found"}"#));
    }

    #[tokio::test]
    async fn timeout_is_reported_as_timeout() {
        let h = handler(Reply::Timeout);

        let resp = h.handle(&ProxyRequest::with_query_city("Oslo")).await;

        assert_eq!(resp.status_code, 500);
        assert_cors(&resp);
        assert_eq!(body(&resp)["error"], json!("Request to external API timed out."));
    }

    #[tokio::test]
    async fn connection_failure_is_network_error() {
        let h = handler(Reply::Connection);

        let resp = h.handle(&ProxyRequest::with_query_city("Oslo")).await;

        assert_eq!(resp.status_code, 500);
        let error = body(&resp)["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("Network connection error"));
    }

    #[tokio::test]
    async fn unexpected_failure_is_internal_error_with_details() {
        let h = handler(Reply::Decode);

        let resp = h.handle(&ProxyRequest::with_query_city("Oslo")).await;

        assert_eq!(resp.status_code, 500);
        let body = body(&resp);
        assert_eq!(body["error"], json!("Internal server error."));
        let details = body["details"].as_str().unwrap();
        assert!(details.contains("expected value at line 1"));
    }

    #[tokio::test]
    async fn handle_event_reads_proxy_event() {
        let h = handler(Reply::Conditions(sunny()));

        let resp = h
            .handle_event(json!({
                "httpMethod": "POST",
                "body": "{\"city\": \"Kyiv\"}",
                "queryStringParameters": null
            }))
            .await;

        assert_eq!(resp.status_code, 200);
        assert_eq!(body(&resp)["city"], json!("Kyiv"));
    }

    #[tokio::test]
    async fn malformed_event_still_gets_a_response() {
        let h = handler(Reply::Conditions(sunny()));

        let resp = h.handle_event(json!({ "body": 17 })).await;

        assert_eq!(resp.status_code, 500);
        assert_cors(&resp);
        assert_eq!(body(&resp)["error"], json!("Internal server error."));
    }
}
