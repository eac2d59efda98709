use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failures raised while talking to the upstream weather provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Upstream answered with a non-success HTTP status.
    #[error("upstream responded with HTTP {status}: {text}")]
    Http { status: u16, text: String },

    #[error("connection to upstream failed: {0}")]
    Connection(String),

    #[error("upstream request timed out: {0}")]
    Timeout(String),

    #[error("failed to decode upstream payload: {0}")]
    Decode(String),

    /// Provider cannot be used with the given configuration.
    #[error("provider misconfigured: {0}")]
    Config(String),

    #[error("upstream request failed: {0}")]
    Request(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        // Timeout wins over connect: a stalled connect is still reported as a timeout.
        if err.is_timeout() {
            ProviderError::Timeout(err.to_string())
        } else if err.is_connect() {
            ProviderError::Connection(err.to_string())
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Request(err.to_string())
        }
    }
}

/// Every way a single invocation can fail.
///
/// The `Display` text of each variant is the caller-facing `error` message.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Neither a body nor query parameters were supplied.
    #[error("City parameter missing in request body or query string.")]
    MissingCity,

    /// Input was supplied but yielded no usable city.
    #[error("City parameter is required.")]
    EmptyCity,

    #[error("Invalid JSON in request body.")]
    InvalidBody,

    #[error("Failed to fetch weather data from external API.")]
    UpstreamHttp { status: u16, text: String },

    #[error("Network connection error while fetching weather data.")]
    UpstreamConnection(String),

    #[error("Request to external API timed out.")]
    UpstreamTimeout(String),

    #[error("Internal server error.")]
    Internal(String),
}

impl HandlerError {
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::MissingCity | HandlerError::EmptyCity | HandlerError::InvalidBody => 400,
            HandlerError::UpstreamHttp { status, .. } => *status,
            HandlerError::UpstreamConnection(_)
            | HandlerError::UpstreamTimeout(_)
            | HandlerError::Internal(_) => 500,
        }
    }

    /// Diagnostic text exposed to the caller alongside the error message.
    pub fn details(&self) -> Option<String> {
        match self {
            HandlerError::UpstreamHttp { text, .. } => {
                Some(format!("HTTP error occurred: {text}"))
            }
            HandlerError::Internal(message) => Some(message.clone()),
            HandlerError::MissingCity
            | HandlerError::EmptyCity
            | HandlerError::InvalidBody
            | HandlerError::UpstreamConnection(_)
            | HandlerError::UpstreamTimeout(_) => None,
        }
    }

    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            error: self.to_string(),
            details: self.details(),
        }
    }
}

impl From<ProviderError> for HandlerError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Http { status, text } => HandlerError::UpstreamHttp { status, text },
            ProviderError::Connection(message) => HandlerError::UpstreamConnection(message),
            ProviderError::Timeout(message) => HandlerError::UpstreamTimeout(message),
            other @ (ProviderError::Decode(_)
            | ProviderError::Config(_)
            | ProviderError::Request(_)) => HandlerError::Internal(other.to_string()),
        }
    }
}

/// Serialized error object returned in the response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
