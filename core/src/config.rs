//! Client configuration.
//!
//! The default base URL is baked in at build time from
//! `READER_API_BASE_URL`. [`ClientConfig::from_env`] lets a process override
//! it and the timeouts at startup; the values are then fixed for the life of
//! the process.

use std::env;
use std::time::Duration;

use crate::error::ApiError;

const FALLBACK_BASE_URL: &str = "http://localhost:3000";

/// Base URL compiled into this build.
pub const BUILD_BASE_URL: &str = match option_env!("READER_API_BASE_URL") {
    Some(url) => url,
    None => FALLBACK_BASE_URL,
};

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_WRITE_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    /// Log request/response headers. Has no effect in release builds.
    pub log_headers: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: BUILD_BASE_URL.to_string(),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            write_timeout: DEFAULT_WRITE_TIMEOUT,
            log_headers: true,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Start from the defaults and apply any `READER_API_*` variables set in
    /// the environment.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ApiError> {
        let mut config = Self::default();
        if let Some(url) = lookup("READER_API_BASE_URL") {
            config.base_url = url;
        }
        if let Some(secs) = lookup("READER_API_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = parse_secs("READER_API_CONNECT_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("READER_API_READ_TIMEOUT_SECS") {
            config.read_timeout = parse_secs("READER_API_READ_TIMEOUT_SECS", &secs)?;
        }
        if let Some(secs) = lookup("READER_API_WRITE_TIMEOUT_SECS") {
            config.write_timeout = parse_secs("READER_API_WRITE_TIMEOUT_SECS", &secs)?;
        }
        if let Some(flag) = lookup("READER_API_LOG_HEADERS") {
            config.log_headers = matches!(flag.trim(), "1" | "true" | "yes" | "on");
        }
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let url = url::Url::parse(&self.base_url).map_err(|e| {
            ApiError::Configuration(format!("base URL {:?} is invalid: {e}", self.base_url))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ApiError::Configuration(format!(
                "base URL must be http or https, got {}",
                url.scheme()
            )));
        }
        for (name, value) in [
            ("connect", self.connect_timeout),
            ("read", self.read_timeout),
            ("write", self.write_timeout),
        ] {
            if value.is_zero() {
                return Err(ApiError::Configuration(format!(
                    "{name} timeout must be greater than zero"
                )));
            }
        }
        Ok(())
    }

    /// Header logging is only ever active in debug builds.
    pub fn header_logging_enabled(&self) -> bool {
        cfg!(debug_assertions) && self.log_headers
    }
}

fn parse_secs(key: &str, value: &str) -> Result<Duration, ApiError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_secs)
        .map_err(|e| ApiError::Configuration(format!("{key} must be a whole number of seconds: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_use_fixed_timeouts() {
        let config = ClientConfig::default();
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert_eq!(config.write_timeout, Duration::from_secs(30));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn environment_overrides_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("READER_API_BASE_URL", "https://api.example.com/"),
            ("READER_API_READ_TIMEOUT_SECS", "5"),
            ("READER_API_LOG_HEADERS", "false"),
        ]))
        .unwrap();
        assert_eq!(config.base_url, "https://api.example.com/");
        assert_eq!(config.read_timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, DEFAULT_CONNECT_TIMEOUT);
        assert!(!config.log_headers);
        assert!(!config.header_logging_enabled());
    }

    #[test]
    fn bad_timeout_is_a_configuration_error() {
        let err = ClientConfig::from_lookup(lookup(&[("READER_API_CONNECT_TIMEOUT_SECS", "ten")]))
            .unwrap_err();
        assert!(matches!(err, ApiError::Configuration(_)));
    }

    #[test]
    fn validate_rejects_bad_urls_and_zero_timeouts() {
        assert!(ClientConfig::new("not a url").validate().is_err());
        assert!(ClientConfig::new("ftp://files.example.com").validate().is_err());

        let config = ClientConfig {
            write_timeout: Duration::ZERO,
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
