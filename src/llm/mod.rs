//! LLM integration for Fashion Decoder.
//!
//! Supports:
//! - **Gemini**: Google Generative Language API (`generateContent`)
//! - **OpenAI**: Chat Completions API
//!
//! Both speak plain HTTPS + JSON through `reqwest` and sit behind the
//! `LlmProvider` trait, so the gateway never sees a vendor type.

pub mod gemini;
pub mod openai;
pub mod provider;

pub use gemini::GeminiProvider;
pub use openai::OpenAiProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::{HeaderMap, RETRY_AFTER};

use crate::error::LlmError;

/// Upper bound on a single provider HTTP call.
const HTTP_TIMEOUT: Duration = Duration::from_secs(60);

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmBackend {
    Gemini,
    OpenAi,
}

impl LlmBackend {
    /// Environment variable holding the API key for this backend.
    pub fn api_key_var(&self) -> &'static str {
        match self {
            Self::Gemini => "GEMINI_API_KEY",
            Self::OpenAi => "OPENAI_API_KEY",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini-2.0-flash",
            Self::OpenAi => "gpt-4o-mini",
        }
    }
}

impl std::fmt::Display for LlmBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gemini => write!(f, "gemini"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

impl std::str::FromStr for LlmBackend {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "gemini" | "googleai" => Ok(Self::Gemini),
            "openai" => Ok(Self::OpenAi),
            _ => Err(format!("Unknown LLM backend: {}", s)),
        }
    }
}

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub backend: LlmBackend,
    pub api_key: secrecy::SecretString,
    pub model: String,
    /// Override for the provider base URL (proxies, tests).
    pub base_url: Option<String>,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider: Arc<dyn LlmProvider> = match config.backend {
        LlmBackend::Gemini => Arc::new(GeminiProvider::new(config)?),
        LlmBackend::OpenAi => Arc::new(OpenAiProvider::new(config)?),
    };
    tracing::info!("Using {} (model: {})", config.backend, config.model);
    Ok(provider)
}

fn http_client(provider: &str) -> Result<reqwest::Client, LlmError> {
    reqwest::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(|e| LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: format!("Failed to create HTTP client: {}", e),
        })
}

/// Map a non-success HTTP status to the matching `LlmError`.
fn status_error(provider: &str, status: StatusCode, headers: &HeaderMap, body: &str) -> LlmError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::AuthFailed {
            provider: provider.to_string(),
        },
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimited {
            provider: provider.to_string(),
            retry_after: headers
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(Duration::from_secs),
        },
        _ => LlmError::RequestFailed {
            provider: provider.to_string(),
            reason: format!("HTTP {}: {}", status, truncate(body, 300)),
        },
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max_chars).collect();
        out.push('…');
        out
    }
}
