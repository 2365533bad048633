use crate::application::poller::{DEFAULT_INTERVAL, DEFAULT_MAX_ATTEMPTS, PollConfig};
use crate::error::{PaymentError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://demo.campay.net";
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Connection settings for the gateway HTTP API.
#[derive(Clone, PartialEq)]
pub struct GatewayConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GatewayConfig {
    /// Reads the gateway settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    /// Reads the gateway settings through `lookup`, which maps a variable name to its value.
    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("API_KEY")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                PaymentError::ConfigError(
                    "API_KEY not found. Make sure it is set in your .env file".to_string(),
                )
            })?;

        let base_url = lookup("CAMPAY_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout = parse_var(lookup, "HTTP_TIMEOUT_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_HTTP_TIMEOUT);

        Ok(Self {
            base_url,
            api_key,
            timeout,
        })
    }
}

impl PollConfig {
    /// Polling settings from the process environment. Needs no credential.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&|key: &str| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: &F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_attempts = parse_var(lookup, "POLL_MAX_ATTEMPTS")?.unwrap_or(DEFAULT_MAX_ATTEMPTS);
        let interval = parse_var(lookup, "POLL_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_INTERVAL);
        Ok(Self {
            max_attempts,
            interval,
        })
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse().map(Some).map_err(|_| {
            PaymentError::ConfigError(format!("{key} must be a non-negative integer, got {raw:?}"))
        }),
    }
}
