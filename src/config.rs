//! Service configuration.

use std::net::{SocketAddr, ToSocketAddrs};
use std::path::PathBuf;

use crate::observability::LogFormat;

/// Default bind host.
pub const DEFAULT_HOST: &str = "0.0.0.0";
/// Default bind port.
pub const DEFAULT_PORT: u16 = 8080;

/// Errors from reading configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} is invalid: {message}")]
    Invalid { name: &'static str, message: String },
}

/// Runtime settings for the reconciliation service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Host to bind (`HOST`).
    pub host: String,
    /// Port to bind (`PORT`).
    pub port: u16,
    /// Log output format (`LOG_FORMAT`: `pretty` or `json`).
    pub log_format: LogFormat,
    /// JSON file of file records loaded into the in-memory store (`RECORDS_SEED_PATH`).
    pub seed_path: Option<PathBuf>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_format: LogFormat::default(),
            seed_path: None,
        }
    }
}

impl ServiceConfig {
    /// Reads configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is set to an unparseable value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads configuration through `lookup`, treating blank values as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(name).and_then(|v| {
                let trimmed = v.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(trimmed.to_string())
                }
            })
        };

        let mut config = Self::default();

        if let Some(host) = get("HOST") {
            config.host = host;
        }
        if let Some(port) = get("PORT") {
            config.port = parse_port(&port)?;
        }
        if let Some(format) = get("LOG_FORMAT") {
            config.log_format = parse_log_format(&format)?;
        }
        config.seed_path = get("RECORDS_SEED_PATH").map(PathBuf::from);

        Ok(config)
    }

    /// Socket address to bind, resolving `host` if it is a hostname.
    ///
    /// # Errors
    ///
    /// Returns an error if `host` does not resolve to any address.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let unresolved = |message: String| ConfigError::Invalid {
            name: "HOST",
            message,
        };
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| unresolved(format!("cannot resolve {}: {e}", self.host)))?
            .next()
            .ok_or_else(|| unresolved(format!("{} resolved to no addresses", self.host)))
    }
}

fn parse_port(value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|e| ConfigError::Invalid {
        name: "PORT",
        message: format!("must be a u16: {e}"),
    })
}

fn parse_log_format(value: &str) -> Result<LogFormat, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "pretty" => Ok(LogFormat::Pretty),
        "json" => Ok(LogFormat::Json),
        other => Err(ConfigError::Invalid {
            name: "LOG_FORMAT",
            message: format!("must be pretty or json (got {other})"),
        }),
    }
}
