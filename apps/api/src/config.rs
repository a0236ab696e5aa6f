use anyhow::{Context, Result};
use serde::Deserialize;

const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_FAST_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_DEEP_MODEL: &str = "gemini-2.5-pro";

/// Application configuration loaded from environment variables.
/// Startup fails if the Gemini credential is missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub models: ModelConfig,
    pub port: u16,
    pub rust_log: String,
}

/// The two model identifiers behind the tier selector.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelConfig {
    pub fast: String,
    pub deep: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            fast: DEFAULT_FAST_MODEL.to_string(),
            deep: DEFAULT_DEEP_MODEL.to_string(),
        }
    }
}

/// Model tier chosen per request. Resolved to an identifier through `ModelConfig`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    #[default]
    Fast,
    Deep,
}

impl ModelConfig {
    pub fn resolve(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Deep => &self.deep,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: require_env("GEMINI_API_KEY")?,
            gemini_api_url: env_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
            models: ModelConfig {
                fast: env_or("JOBBERLY_FAST_MODEL", DEFAULT_FAST_MODEL),
                deep: env_or("JOBBERLY_DEEP_MODEL", DEFAULT_DEEP_MODEL),
            },
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}
