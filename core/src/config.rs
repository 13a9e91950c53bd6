//! Environment-level configuration for the remote API.

use std::time::Duration;

use crate::error::ConfigError;
use crate::probe::DEFAULT_PROBE_TIMEOUT;

pub const ENV_API_URL: &str = "CONTACTS_API_URL";
pub const ENV_TIMEOUT_MS: &str = "CONTACTS_API_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the API; empty disables remote mode.
    pub base_url: String,
    /// Bound on the availability probe.
    pub timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout: DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads the process environment. A value from `overrides` (command-line
    /// flags, say) wins over the environment for the same key.
    pub fn from_env_with<F>(overrides: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::from_lookup(|key| overrides(key).or_else(|| std::env::var(key).ok()))
    }

    /// Builds a config from an arbitrary key lookup. Missing keys fall back
    /// to the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(ENV_API_URL).unwrap_or_default().trim().to_string();
        let timeout = match lookup(ENV_TIMEOUT_MS) {
            None => DEFAULT_PROBE_TIMEOUT,
            Some(raw) => parse_timeout_ms(&raw)?,
        };
        Ok(Self { base_url, timeout })
    }

    pub fn remote_enabled(&self) -> bool {
        !self.base_url.is_empty()
    }
}

fn parse_timeout_ms(raw: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason: &str| ConfigError::Invalid {
        key: ENV_TIMEOUT_MS,
        value: raw.to_string(),
        reason: reason.to_string(),
    };
    let ms: u64 = raw.trim().parse().map_err(|_| invalid("expected milliseconds"))?;
    if ms == 0 {
        return Err(invalid("must be greater than zero"));
    }
    Ok(Duration::from_millis(ms))
}
