use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// A missing `OPENAI_API_KEY` does not stop startup; requests fail with 500 instead.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: Option<String>,
    pub log_prompts: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: optional_env("OPENAI_API_KEY"),
            log_prompts: flag_enabled(std::env::var("LOG_PROMPTS").ok().as_deref()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

/// Empty values count as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Only the literal `"1"` turns a flag on.
fn flag_enabled(value: Option<&str>) -> bool {
    value == Some("1")
}
