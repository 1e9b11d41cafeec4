use std::env;
use std::time::Duration;

use log::warn;

use crate::errors::ConfigError;

const HOST: &str = "0.0.0.0";
const PORT: u16 = 8080;
const GEMINI_MODEL: &str = "gemini-2.0-flash";
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GEMINI_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub gemini: GeminiConfig,
    pub maps_api_key: Option<String>,
}

impl AppConfig {
    /// Reads the process environment. Only `GEMINI_API_KEY` is required;
    /// unparsable numbers fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = non_empty_var("GEMINI_API_KEY").ok_or(ConfigError::MissingVar("GEMINI_API_KEY"))?;

        let host = env::var("HOST").unwrap_or_else(|_| HOST.to_string());
        let port = parse_or_default("PORT", PORT);
        let timeout_secs = parse_or_default("GEMINI_TIMEOUT_SECS", GEMINI_TIMEOUT_SECS);

        let base_url = env::var("GEMINI_BASE_URL").unwrap_or_else(|_| GEMINI_BASE_URL.to_string());
        if url::Url::parse(&base_url).is_err() {
            return Err(ConfigError::InvalidValue {
                name: "GEMINI_BASE_URL",
                value: base_url,
            });
        }

        Ok(Self {
            host,
            port,
            gemini: GeminiConfig {
                api_key,
                model: env::var("GEMINI_MODEL").unwrap_or_else(|_| GEMINI_MODEL.to_string()),
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
            maps_api_key: non_empty_var("GOOGLE_MAPS_API_KEY"),
        })
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|value| !value.trim().is_empty())
}

fn parse_or_default<T>(name: &str, default: T) -> T
where
    T: std::str::FromStr + std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring invalid {}={:?}, using {}", name, raw, default);
            default
        }),
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: [&str; 7] = [
        "GEMINI_API_KEY",
        "GEMINI_MODEL",
        "GEMINI_BASE_URL",
        "GEMINI_TIMEOUT_SECS",
        "GOOGLE_MAPS_API_KEY",
        "HOST",
        "PORT",
    ];

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn test_missing_api_key() {
        clear_env();
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::MissingVar("GEMINI_API_KEY"))
        ));
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        env::set_var("GEMINI_API_KEY", "abc");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.gemini.model, "gemini-2.0-flash");
        assert_eq!(config.gemini.timeout, Duration::from_secs(60));
        assert_eq!(config.maps_api_key, None);
        clear_env();
    }

    #[test]
    #[serial]
    fn test_overrides_and_bad_numbers() {
        clear_env();
        env::set_var("GEMINI_API_KEY", "abc");
        env::set_var("PORT", "not-a-port");
        env::set_var("GEMINI_TIMEOUT_SECS", "15");
        env::set_var("GOOGLE_MAPS_API_KEY", "maps-key");

        let config = AppConfig::from_env().unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.gemini.timeout, Duration::from_secs(15));
        assert_eq!(config.maps_api_key.as_deref(), Some("maps-key"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_base_url() {
        clear_env();
        env::set_var("GEMINI_API_KEY", "abc");
        env::set_var("GEMINI_BASE_URL", "not a url");
        assert!(matches!(
            AppConfig::from_env(),
            Err(ConfigError::InvalidValue { name: "GEMINI_BASE_URL", .. })
        ));
        clear_env();
    }
}
