//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// `None` is allowed at startup; generation requests then fail with a configuration error.
    pub gemini_api_key: Option<String>,
    /// OpenAI-compatible endpoint used for issue text and rewrites.
    pub gemini_openai_base: String,
    /// Native REST endpoint used for image generation.
    pub gemini_api_base: String,
    pub content_model: String,
    pub rewrite_model: String,
    pub image_model: String,
    pub data_file: PathBuf,
    /// When set, issues are kept in Postgres instead of `data_file`.
    pub database_url: Option<String>,
    pub cors_origin: String,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        // --- Load Server Settings ---
        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let cors_origin = std::env::var("CORS_ORIGIN")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        if cors_origin.parse::<axum::http::HeaderValue>().is_err() {
            return Err(ConfigError::InvalidValue(
                "CORS_ORIGIN".to_string(),
                format!("'{}' is not a valid header value", cors_origin),
            ));
        }

        // --- Load Provider Settings (key is optional) ---
        let gemini_api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty());

        let gemini_openai_base = std::env::var("GEMINI_OPENAI_BASE").unwrap_or_else(|_| {
            "https://generativelanguage.googleapis.com/v1beta/openai".to_string()
        });
        let gemini_api_base = std::env::var("GEMINI_API_BASE")
            .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string());

        let content_model =
            std::env::var("CONTENT_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let rewrite_model =
            std::env::var("REWRITE_MODEL").unwrap_or_else(|_| "gemini-2.5-flash".to_string());
        let image_model = std::env::var("IMAGE_MODEL")
            .unwrap_or_else(|_| "gemini-2.0-flash-preview-image-generation".to_string());

        // --- Load Storage Settings ---
        let data_file = std::env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/issues.json"));
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(Self {
            bind_address,
            log_level,
            gemini_api_key,
            gemini_openai_base,
            gemini_api_base,
            content_model,
            rewrite_model,
            image_model,
            data_file,
            database_url,
            cors_origin,
        })
    }

    /// Defaults for a server bound to `bind_address`, with no provider key and the given data file.
    pub fn local(bind_address: SocketAddr, data_file: PathBuf) -> Self {
        Self {
            bind_address,
            log_level: Level::INFO,
            gemini_api_key: None,
            gemini_openai_base: "https://generativelanguage.googleapis.com/v1beta/openai"
                .to_string(),
            gemini_api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            content_model: "gemini-2.5-flash".to_string(),
            rewrite_model: "gemini-2.5-flash".to_string(),
            image_model: "gemini-2.0-flash-preview-image-generation".to_string(),
            data_file,
            database_url: None,
            cors_origin: "http://localhost:3000".to_string(),
        }
    }
}
