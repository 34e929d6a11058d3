use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use crate::workflows::loan_application::DEFAULT_SUBMISSION_DELAY;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_LOG_LEVEL: &str = "info";

/// Settings for the intake service and the CLI, read from `.env` and `APP_*` variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub submission: SubmissionConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            server: ServerConfig::from_env()?,
            telemetry: TelemetryConfig::from_env(),
            submission: SubmissionConfig::from_env()?,
        })
    }
}

/// Non-blank value of `key`, trimmed.
fn var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|raw| raw.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let port = match var("APP_PORT") {
            Some(raw) => raw
                .parse()
                .map_err(|_| ConfigError::InvalidPort { value: raw })?,
            None => DEFAULT_PORT,
        };

        Ok(Self {
            host: var("APP_HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
        })
    }

    /// `localhost` or a literal IP; no DNS lookups.
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip = if self.host.eq_ignore_ascii_case("localhost") {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        } else {
            self.host
                .parse()
                .map_err(|source| ConfigError::InvalidHost {
                    value: self.host.clone(),
                    source,
                })?
        };

        Ok(SocketAddr::new(ip, self.port))
    }
}

#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl TelemetryConfig {
    fn from_env() -> Self {
        Self {
            log_level: var("APP_LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
        }
    }
}

/// Where completed applications go. Without an endpoint the simulated gateway is used.
#[derive(Debug, Clone)]
pub struct SubmissionConfig {
    pub delay: Duration,
    pub endpoint: Option<String>,
}

impl SubmissionConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let delay = match var("APP_SUBMISSION_DELAY_MS") {
            Some(raw) => raw
                .parse()
                .map(Duration::from_millis)
                .map_err(|_| ConfigError::InvalidSubmissionDelay { value: raw })?,
            None => DEFAULT_SUBMISSION_DELAY,
        };

        let endpoint = var("APP_SUBMISSION_ENDPOINT")
            .map(|raw| {
                if raw.starts_with("http://") || raw.starts_with("https://") {
                    Ok(raw)
                } else {
                    Err(ConfigError::InvalidSubmissionEndpoint { value: raw })
                }
            })
            .transpose()?;

        Ok(Self { delay, endpoint })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("APP_PORT must be a port number, got '{value}'")]
    InvalidPort { value: String },
    #[error("APP_HOST must be localhost or an IP address, got '{value}'")]
    InvalidHost {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("APP_SUBMISSION_DELAY_MS must be a whole number of milliseconds, got '{value}'")]
    InvalidSubmissionDelay { value: String },
    #[error("APP_SUBMISSION_ENDPOINT must be an http(s) URL, got '{value}'")]
    InvalidSubmissionEndpoint { value: String },
}
