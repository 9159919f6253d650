use anyhow::{Context, Result};

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the resume screening service.
    pub screening_api_url: String,
    /// Full URL of the streaming career-chat endpoint.
    pub chat_api_url: String,
    /// Optional bearer token sent with chat requests.
    pub chat_api_key: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            screening_api_url: std::env::var("SCREENING_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            chat_api_url: require_env("CHAT_API_URL")?,
            chat_api_key: std::env::var("CHAT_API_KEY").ok(),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
