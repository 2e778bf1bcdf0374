//! Runtime configuration loaded from the environment (and `.env`).

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_MODEL: &str = "gemini-pro-latest";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{key} has an invalid value '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub generated_files_dir: PathBuf,
    pub history_file: PathBuf,
    pub static_dir: PathBuf,
    pub host: String,
    pub port: u16,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let api_key = env::var("GOOGLE_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::Missing("GOOGLE_API_KEY"))?;

        Ok(Self {
            api_key,
            model: var_or("GEMINI_MODEL", DEFAULT_MODEL),
            api_base_url: var_or("GEMINI_API_BASE", DEFAULT_API_BASE)
                .trim_end_matches('/')
                .to_string(),
            generated_files_dir: PathBuf::from(var_or("GENERATED_FILES_DIR", "generated_files")),
            history_file: PathBuf::from(var_or("HISTORY_FILE", "history.json")),
            static_dir: PathBuf::from(var_or("STATIC_DIR", "static")),
            host: var_or("HOST", "0.0.0.0"),
            port: parse_var("PORT", 8080)?,
            request_timeout: Duration::from_secs(parse_var("REQUEST_TIMEOUT_SECS", 120)?),
        })
    }

    /// Configuration rooted at `base`, for tests and local tooling.
    pub fn local(base: &std::path::Path, api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_base_url: DEFAULT_API_BASE.to_string(),
            generated_files_dir: base.join("generated_files"),
            history_file: base.join("history.json"),
            static_dir: base.join("static"),
            host: "127.0.0.1".to_string(),
            port: 8080,
            request_timeout: Duration::from_secs(120),
        }
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_var<T: std::str::FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) if !value.trim().is_empty() => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        _ => Ok(default),
    }
}
