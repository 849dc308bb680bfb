use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

const MIN_MAX_TOKENS: u32 = 256;
const MAX_MAX_TOKENS: u32 = 4000;

/// Application configuration loaded once at startup.
/// Every key is optional; a missing `OPENAI_API_KEY` puts the service in offline mode.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub openai_base_url: String,
    pub model: String,
    /// Generation safety cap, clamped to 256..=4000.
    pub max_tokens: u32,
    /// Clamped to 0.0..=1.0.
    pub temperature: f32,
    pub llm_timeout_secs: u64,
    pub max_keywords: usize,
    pub sessions_dir: Option<PathBuf>,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 1200,
            temperature: 0.2,
            llm_timeout_secs: 60,
            max_keywords: 40,
            sessions_dir: None,
            port: 8080,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Config::default();

        let max_tokens: u32 = parse_or(get("MAX_TOKENS"), "MAX_TOKENS", defaults.max_tokens)?;
        let temperature: f32 = parse_or(get("TEMPERATURE"), "TEMPERATURE", defaults.temperature)?;

        Ok(Config {
            openai_api_key: get("OPENAI_API_KEY"),
            openai_base_url: get("OPENAI_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(defaults.openai_base_url),
            model: get("LLM_MODEL").unwrap_or(defaults.model),
            max_tokens: max_tokens.clamp(MIN_MAX_TOKENS, MAX_MAX_TOKENS),
            temperature: temperature.clamp(0.0, 1.0),
            llm_timeout_secs: parse_or(
                get("LLM_TIMEOUT_SECS"),
                "LLM_TIMEOUT_SECS",
                defaults.llm_timeout_secs,
            )?,
            max_keywords: parse_or(get("MAX_KEYWORDS"), "MAX_KEYWORDS", defaults.max_keywords)?,
            sessions_dir: get("SESSIONS_DIR").map(PathBuf::from),
            port: parse_or(get("PORT"), "PORT", defaults.port)
                .context("PORT must be a valid port number")?,
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value: {raw}")),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_empty_environment_uses_defaults() {
        let config = config_from(&[]).unwrap();
        assert!(config.openai_api_key.is_none());
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.max_tokens, 1200);
        assert!((config.temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn test_blank_api_key_counts_as_unset() {
        let config = config_from(&[("OPENAI_API_KEY", "   ")]).unwrap();
        assert!(config.openai_api_key.is_none());
    }

    #[test]
    fn test_api_key_enables_llm() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-test"), ("LLM_MODEL", "gpt-4o")]).unwrap();
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.model, "gpt-4o");
    }

    #[test]
    fn test_generation_caps_are_clamped() {
        let config = config_from(&[("MAX_TOKENS", "99999"), ("TEMPERATURE", "3.5")]).unwrap();
        assert_eq!(config.max_tokens, 4000);
        assert!((config.temperature - 1.0).abs() < f32::EPSILON);

        let config = config_from(&[("MAX_TOKENS", "10"), ("TEMPERATURE", "-1")]).unwrap();
        assert_eq!(config.max_tokens, 256);
        assert_eq!(config.temperature, 0.0);
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err = config_from(&[("MAX_TOKENS", "lots")]).unwrap_err();
        assert!(err.to_string().contains("MAX_TOKENS"));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = config_from(&[("OPENAI_BASE_URL", "http://localhost:9000/v1/")]).unwrap();
        assert_eq!(config.openai_base_url, "http://localhost:9000/v1");
    }
}
