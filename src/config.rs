use crate::batch::BatchOptions;
use crate::provider::{ProviderEndpoint, DEFAULT_USER_AGENT};
use crate::resolver::FallbackDelay;
use anyhow::{bail, Context, Result};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,

    // Remote endpoints
    pub provider_endpoints: Vec<ProviderEndpoint>,
    pub provider_timeout: Duration,
    pub user_agent: String,

    // Dictionary fallback
    pub fallback_delay: FallbackDelay,

    // Line-by-line file translation
    pub batch_pace_every: usize,
    pub batch_pace_delay: Duration,

    // Input limits
    pub max_text_chars: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            provider_endpoints: ProviderEndpoint::defaults(),
            provider_timeout: Duration::from_secs(5),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fallback_delay: FallbackDelay::default(),
            batch_pace_every: 5,
            batch_pace_delay: Duration::from_millis(200),
            max_text_chars: 5000,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let defaults = Config::default();

        let provider_endpoints = match std::env::var("TRANSLATE_ENDPOINTS") {
            Ok(value) if !value.trim().is_empty() => parse_endpoints(&value)?,
            _ => defaults.provider_endpoints,
        };

        let provider_timeout_secs =
            env_parse("PROVIDER_TIMEOUT_SECS", defaults.provider_timeout.as_secs());
        if provider_timeout_secs == 0 {
            bail!("PROVIDER_TIMEOUT_SECS must be at least 1");
        }

        let default_min = defaults.fallback_delay.min.as_millis() as u64;
        let default_max = defaults.fallback_delay.max.as_millis() as u64;
        let delay_min = env_parse("FALLBACK_DELAY_MIN_MS", default_min);
        let delay_max = env_parse("FALLBACK_DELAY_MAX_MS", default_max);
        if delay_min > delay_max {
            bail!(
                "FALLBACK_DELAY_MIN_MS ({}) must not exceed FALLBACK_DELAY_MAX_MS ({})",
                delay_min,
                delay_max
            );
        }

        Ok(Self {
            // Server
            host: std::env::var("HOST").unwrap_or(defaults.host),
            port: env_parse("PORT", defaults.port),

            // Remote endpoints
            provider_endpoints,
            provider_timeout: Duration::from_secs(provider_timeout_secs),
            user_agent: std::env::var("TRANSLATE_USER_AGENT").unwrap_or(defaults.user_agent),

            // Dictionary fallback
            fallback_delay: FallbackDelay::new(
                Duration::from_millis(delay_min),
                Duration::from_millis(delay_max),
            ),

            // Line-by-line file translation
            batch_pace_every: env_parse("BATCH_PACE_EVERY", defaults.batch_pace_every),
            batch_pace_delay: Duration::from_millis(env_parse(
                "BATCH_PACE_DELAY_MS",
                defaults.batch_pace_delay.as_millis() as u64,
            )),

            // Input limits
            max_text_chars: env_parse("MAX_TEXT_CHARS", defaults.max_text_chars),
        })
    }

    pub fn batch_options(&self) -> BatchOptions {
        BatchOptions {
            pace_every: self.batch_pace_every,
            pace_delay: self.batch_pace_delay,
        }
    }
}

/// Read an optional numeric variable, falling back to `default` when unset or invalid
fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Comma-separated endpoint templates, in priority order
fn parse_endpoints(value: &str) -> Result<Vec<ProviderEndpoint>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .enumerate()
        .map(|(i, template)| {
            ProviderEndpoint::new(template)
                .with_context(|| format!("Invalid TRANSLATE_ENDPOINTS entry #{}", i + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "HOST",
        "PORT",
        "TRANSLATE_ENDPOINTS",
        "PROVIDER_TIMEOUT_SECS",
        "TRANSLATE_USER_AGENT",
        "FALLBACK_DELAY_MIN_MS",
        "FALLBACK_DELAY_MAX_MS",
        "BATCH_PACE_EVERY",
        "BATCH_PACE_DELAY_MS",
        "MAX_TEXT_CHARS",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_defaults() {
        clear_env();
        let config = Config::from_env().expect("Should load defaults");

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.provider_endpoints, ProviderEndpoint::defaults());
        assert_eq!(config.provider_timeout, Duration::from_secs(5));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert_eq!(config.fallback_delay, FallbackDelay::default());
        assert_eq!(config.batch_pace_every, 5);
        assert_eq!(config.batch_pace_delay, Duration::from_millis(200));
        assert_eq!(config.max_text_chars, 5000);
    }

    #[test]
    #[serial]
    fn test_from_env_overrides() {
        clear_env();
        std::env::set_var("PORT", "3000");
        std::env::set_var(
            "TRANSLATE_ENDPOINTS",
            "http://localhost:9000/a?q={q}, http://localhost:9001/b?sl={sl}&q={q}",
        );
        std::env::set_var("PROVIDER_TIMEOUT_SECS", "2");
        std::env::set_var("FALLBACK_DELAY_MIN_MS", "0");
        std::env::set_var("FALLBACK_DELAY_MAX_MS", "0");
        std::env::set_var("BATCH_PACE_EVERY", "0");

        let config = Config::from_env().expect("Should load overrides");
        clear_env();

        assert_eq!(config.port, 3000);
        assert_eq!(config.provider_endpoints.len(), 2);
        assert_eq!(config.provider_endpoints[1].label(), "http://localhost:9001/b");
        assert_eq!(config.provider_timeout, Duration::from_secs(2));
        assert_eq!(config.fallback_delay, FallbackDelay::none());
        assert_eq!(config.batch_options().pace_every, 0);
    }

    #[test]
    #[serial]
    fn test_from_env_invalid_numbers_use_defaults() {
        clear_env();
        std::env::set_var("PORT", "not-a-port");
        std::env::set_var("MAX_TEXT_CHARS", "-1");

        let config = Config::from_env().expect("Should fall back to defaults");
        clear_env();

        assert_eq!(config.port, 8080);
        assert_eq!(config.max_text_chars, 5000);
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_bad_endpoint() {
        clear_env();
        std::env::set_var("TRANSLATE_ENDPOINTS", "https://example.com/no-placeholder");

        let result = Config::from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(format!("{:#}", err).contains("TRANSLATE_ENDPOINTS entry #1"));
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_inverted_delay() {
        clear_env();
        std::env::set_var("FALLBACK_DELAY_MIN_MS", "2000");
        std::env::set_var("FALLBACK_DELAY_MAX_MS", "100");

        let result = Config::from_env();
        clear_env();

        assert!(result.is_err());
    }

    #[test]
    #[serial]
    fn test_from_env_rejects_zero_timeout() {
        clear_env();
        std::env::set_var("PROVIDER_TIMEOUT_SECS", "0");

        let result = Config::from_env();
        clear_env();

        let err = result.unwrap_err();
        assert!(err.to_string().contains("PROVIDER_TIMEOUT_SECS"));
    }
}
