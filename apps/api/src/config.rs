use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
const DEFAULT_GENERATION_MODEL: &str = "gemini-2.5-flash";

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing.
///
/// Upstream credentials are optional here: a missing Gemini key surfaces as a
/// configuration error on first use, a missing YouTube key disables learning
/// resources.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub gemini_api_key: Option<String>,
    pub gemini_embedding_model: String,
    pub gemini_model: String,
    pub youtube_api_key: Option<String>,
    pub upstream_timeout: Duration,
    pub resource_cache_max_entries: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            jwt_secret: require_env("JWT_SECRET")?,
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_embedding_model: optional_env("GEMINI_EMBEDDING_MODEL")
                .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GENERATION_MODEL.to_string()),
            youtube_api_key: optional_env("YOUTUBE_API_KEY"),
            upstream_timeout: Duration::from_secs(parse_env("UPSTREAM_TIMEOUT_SECS", 30)?),
            resource_cache_max_entries: parse_env("RESOURCE_CACHE_MAX_ENTRIES", 1024)?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Treats unset and blank values the same way.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
