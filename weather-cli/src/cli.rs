use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use inquire::{Password, Text};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};
use weather_core::{Config, ErrorBody, ProxyRequest, ProxyResponse, WeatherHandler, WeatherReport};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "City weather lookup")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store upstream provider credentials in the config file.
    Configure,

    /// Show current weather for a city.
    Show {
        /// City name, passed to the provider as-is.
        city: String,
    },

    /// Run the handler on a raw proxy event and print the raw response.
    Invoke {
        /// Path to a JSON proxy event.
        #[arg(long, conflicts_with = "city")]
        event: Option<PathBuf>,

        /// Build a query-string event for this city instead of reading a file.
        #[arg(long)]
        city: Option<String>,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city } => {
                let handler = handler_from_config()?;
                let response = handler.handle(&ProxyRequest::with_query_city(city)).await;
                print_human(&response)
            }
            Command::Invoke { event, city } => {
                let handler = handler_from_config()?;
                let event = match (event, city) {
                    (Some(path), _) => read_event(&path)?,
                    (None, Some(city)) => {
                        serde_json::to_value(ProxyRequest::with_query_city(city))?
                    }
                    (None, None) => bail!("Pass either --event <file> or --city <name>."),
                };

                let response = handler.handle_event(event).await;
                println!("{}", serde_json::to_string_pretty(&response)?);
                Ok(())
            }
        }
    }
}

/// Config file values, overridden by any environment variables that are set.
fn handler_from_config() -> Result<WeatherHandler> {
    let config = Config::load()?.with_env_overrides()?;
    if config.api_url.is_none() {
        tracing::warn!("No API URL configured; run `weather configure` or set WEATHER_API_URL");
    }

    WeatherHandler::from_config(&config).context("Failed to set up weather provider")
}

fn configure() -> Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("RapidAPI key:")
        .without_confirmation()
        .with_help_message("Leave empty to keep the current key")
        .prompt()?;
    if !api_key.is_empty() {
        config.api_key = Some(api_key);
    }

    config.api_host = prompt_optional("RapidAPI host:", config.api_host.as_deref())?;
    config.api_url = prompt_optional("Weather API URL:", config.api_url.as_deref())?;

    let path = config.save()?;
    println!("Configuration saved to {}", path.display());
    Ok(())
}

fn prompt_optional(message: &str, current: Option<&str>) -> Result<Option<String>> {
    let mut prompt = Text::new(message);
    if let Some(current) = current {
        prompt = prompt.with_default(current);
    }

    let value = prompt.prompt()?;
    Ok(Some(value.trim().to_string()).filter(|v| !v.is_empty()))
}

fn read_event(path: &Path) -> Result<serde_json::Value> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read event file: {}", path.display()))?;

    serde_json::from_str(&contents)
        .with_context(|| format!("Event file is not valid JSON: {}", path.display()))
}

fn print_human(response: &ProxyResponse) -> Result<()> {
    if !response.is_success() {
        let err: ErrorBody =
            serde_json::from_str(&response.body).context("Unexpected error body from handler")?;
        match err.details {
            Some(details) => bail!("{} (HTTP {}): {details}", err.error, response.status_code),
            None => bail!("{} (HTTP {})", err.error, response.status_code),
        }
    }

    let report: WeatherReport =
        serde_json::from_str(&response.body).context("Unexpected report body from handler")?;

    println!("{}", report.city);
    match &report.description {
        Some(description) => println!("  {}", text(description)),
        None => println!("  no description"),
    }
    println!("  Temperature: {}", kelvin(report.temperature.as_ref()));
    println!("  Feels like:  {}", kelvin(report.feels_like.as_ref()));
    println!("  Humidity:    {}", or_dash(report.humidity.as_ref(), "%"));
    println!("  Wind:        {}", or_dash(report.wind_speed.as_ref(), " m/s"));
    println!("  As of:       {}", report.timestamp.format("%Y-%m-%d %H:%M:%S UTC"));

    Ok(())
}

/// Strings print without quotes; anything else prints as JSON.
fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Non-numeric temperatures are shown as received.
fn kelvin(value: Option<&Value>) -> String {
    match value {
        Some(v) => match v.as_f64() {
            Some(k) => format!("{k:.1} K ({:.1} °C)", k - 273.15),
            None => text(v),
        },
        None => "-".to_string(),
    }
}

fn or_dash(value: Option<&Value>, unit: &str) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{}{unit}", text(v)))
}
