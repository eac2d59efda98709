//! Function-runtime entrypoint for the city weather handler.
//!
//! Configuration is read from the environment once per cold start; every
//! invocation is then served by the same stateless `WeatherHandler`.

use lambda_runtime::{Error, LambdaEvent, run, service_fn};
use serde_json::Value;
use tracing_subscriber::EnvFilter;
use weather_core::{Config, ProxyResponse, WeatherHandler};

#[tokio::main]
async fn main() -> Result<(), Error> {
    // JSON lines without ANSI colours so the log stream stays machine-readable.
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_ansi(false)
        .without_time()
        .init();

    let config = Config::from_env()?;
    tracing::info!(
        api_url = config.api_url.as_deref().unwrap_or("<unset>"),
        has_api_key = config.api_key.is_some(),
        timeout_secs = config.timeout_secs,
        "Configuration loaded"
    );

    let handler = WeatherHandler::from_config(&config)?;
    let handler = &handler;

    run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ProxyResponse, Error>(handler.handle_event(event.payload).await)
    }))
    .await
}
