use anyhow::{Context, Result};

use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    /// `redis://…`, `memory:`, or a directory for the file store.
    pub storage_url: String,
    pub enhance_api_url: String,
    pub enhance_api_key: String,
    pub enhance_model: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            storage_url: env_or("STORAGE_URL", "./data"),
            enhance_api_url: env_or("ENHANCE_API_URL", DEFAULT_API_URL),
            enhance_api_key: require_env("ENHANCE_API_KEY")?,
            enhance_model: env_or("ENHANCE_MODEL", DEFAULT_MODEL),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
