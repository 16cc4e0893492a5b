//! Configuration types, built from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::gateway::GatewayConfig;
use crate::llm::{LlmBackend, LlmConfig};

/// HTTP server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: String,
    pub port: u16,
    /// Upper bound on a single gateway call before the session gives up.
    pub gateway_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 9002,
            gateway_timeout: Duration::from_secs(60),
        }
    }
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind, self.port)
            .parse()
            .map_err(|e| ConfigError::InvalidValue {
                key: "FASHION_BIND".to_string(),
                message: format!("{}", e),
            })
    }
}

/// Full application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub llm: LlmConfig,
    pub gateway: GatewayConfig,
    pub server: ServerConfig,
    /// Directory for rolling log files; stderr only when unset.
    pub log_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Build config from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build config from an arbitrary key lookup (used by tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let backend: LlmBackend = match lookup("FASHION_LLM_BACKEND") {
            Some(raw) => raw.parse().map_err(|message| ConfigError::InvalidValue {
                key: "FASHION_LLM_BACKEND".to_string(),
                message,
            })?,
            None => LlmBackend::Gemini,
        };

        let key_var = backend.api_key_var();
        let api_key = lookup(key_var)
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(key_var.to_string()))?;

        let model = lookup("FASHION_MODEL").unwrap_or_else(|| backend.default_model().to_string());

        let defaults = ServerConfig::default();
        let port = parse_or(&lookup, "FASHION_PORT", defaults.port)?;
        let timeout_secs = parse_or(
            &lookup,
            "FASHION_GATEWAY_TIMEOUT_SECS",
            defaults.gateway_timeout.as_secs(),
        )?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "FASHION_GATEWAY_TIMEOUT_SECS".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(Self {
            llm: LlmConfig {
                backend,
                api_key: SecretString::from(api_key),
                model,
                base_url: lookup("FASHION_LLM_BASE_URL"),
            },
            gateway: GatewayConfig::default(),
            server: ServerConfig {
                bind: lookup("FASHION_BIND").unwrap_or(defaults.bind),
                port,
                gateway_timeout: Duration::from_secs(timeout_secs),
            },
            log_dir: lookup("FASHION_LOG_DIR").map(PathBuf::from),
        })
    }
}

fn parse_or<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
