use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::llm_client::{LlmSettings, DEFAULT_API_URL, DEFAULT_MODEL};

const DEFAULT_PORT: u16 = 3003;
const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub ai_enabled: bool,
    pub ai_api_url: String,
    pub ai_model: String,
    pub ai_api_key: Option<String>,
    pub ai_timeout: Duration,
    /// Empty means permissive CORS.
    pub allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            rust_log: "info".to_string(),
            ai_enabled: true,
            ai_api_url: DEFAULT_API_URL.to_string(),
            ai_model: DEFAULT_MODEL.to_string(),
            ai_api_key: None,
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
            allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Config {
            port: match get("PORT") {
                Some(v) => v
                    .parse::<u16>()
                    .context("PORT must be a valid port number")?,
                None => defaults.port,
            },
            rust_log: get("RUST_LOG").unwrap_or(defaults.rust_log),
            ai_enabled: match get("AI_ENABLED") {
                Some(v) => parse_bool(&v).context("AI_ENABLED must be true or false")?,
                None => defaults.ai_enabled,
            },
            ai_api_url: get("AI_API_URL").unwrap_or(defaults.ai_api_url),
            ai_model: get("AI_MODEL").unwrap_or(defaults.ai_model),
            ai_api_key: get("AI_API_KEY"),
            ai_timeout: match get("AI_TIMEOUT_SECS") {
                Some(v) => Duration::from_secs(
                    v.parse::<u64>()
                        .context("AI_TIMEOUT_SECS must be a whole number of seconds")?,
                ),
                None => defaults.ai_timeout,
            },
            allowed_origins: get("ALLOWED_ORIGINS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|o| !o.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
        })
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            api_url: self.ai_api_url.clone(),
            model: self.ai_model.clone(),
            api_key: self.ai_api_key.clone(),
            timeout: self.ai_timeout,
        }
    }
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => bail!("unrecognized boolean '{other}'"),
    }
}
