use anyhow::{Context, Result};

use crate::analysis::rubric::PresetName;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    /// Optional: without it every rewrite fails as unavailable, analysis still works.
    pub anthropic_api_key: Option<String>,
    /// Token budget handed to the rewrite call.
    pub rewrite_max_tokens: u32,
    pub rewrite_timeout_secs: u64,
    /// Upper bound on a whole request, including the rewrite call.
    pub request_timeout_secs: u64,
    /// Texts shorter than this are rejected as too short to analyze.
    pub min_input_chars: usize,
    pub default_preset: PresetName,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            rewrite_max_tokens: parse_env("REWRITE_MAX_TOKENS", 4096)?,
            rewrite_timeout_secs: parse_env("REWRITE_TIMEOUT_SECS", 120)?,
            request_timeout_secs: parse_env("REQUEST_TIMEOUT_SECS", 180)?,
            min_input_chars: parse_env("MIN_INPUT_CHARS", 50)?,
            default_preset: std::env::var("RUBRIC_PRESET")
                .unwrap_or_else(|_| "analysis".to_string())
                .parse::<PresetName>()
                .map_err(anyhow::Error::msg)
                .context("RUBRIC_PRESET must be 'analysis' or 'quick'")?,
            port: parse_env("PORT", 8080).context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}
