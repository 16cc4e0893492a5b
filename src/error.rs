//! Error types for Fashion Decoder.

use std::time::Duration;

/// Top-level error type for the service.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Attachment error: {0}")]
    Attachment(#[from] AttachmentError),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited, retry after {retry_after:?}")]
    RateLimited {
        provider: String,
        retry_after: Option<Duration>,
    },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors surfaced by the AI assistance gateway.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Invalid gateway request: {reason}")]
    InvalidRequest { reason: String },

    /// The model answered, but not with the structure the operation requires.
    /// The message is deliberately generic; `detail` is for logs only.
    #[error("{message}")]
    InvalidResponse {
        message: &'static str,
        detail: String,
    },

    #[error("AI request timed out after {after:?}")]
    Timeout { after: Duration },

    #[error("AI request was interrupted")]
    Interrupted,

    #[error(transparent)]
    Llm(#[from] LlmError),
}

/// Image attachment errors.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentError {
    #[error("Could not read the selected image: {reason}")]
    ReadFailure { reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Catalog parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Malformed price: {0:?}")]
    MalformedPrice(String),

    #[error("Malformed price range: {0:?}")]
    MalformedPriceRange(String),
}

/// Result type alias for the service.
pub type Result<T> = std::result::Result<T, Error>;
