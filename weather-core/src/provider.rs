use async_trait::async_trait;
use std::fmt::Debug;

use crate::{Config, error::ProviderError, model::Conditions, provider::rapidapi::RapidApiProvider};

pub mod rapidapi;

/// Source of current weather conditions for a named city.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn current_conditions(&self, city: &str) -> Result<Conditions, ProviderError>;
}

/// Construct the upstream provider described by `config`.
pub fn provider_from_config(config: &Config) -> Result<Box<dyn WeatherProvider>, ProviderError> {
    Ok(Box::new(RapidApiProvider::new(config)?))
}
