//! Runtime configuration loaded from the environment
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file in the working directory. The three OAuth values are required;
//! startup aborts with the name of the first one that is missing.

use std::env;
use std::path::PathBuf;
use thiserror::Error;

pub const CLIENT_ID_VAR: &str = "SPOTIFY_CLIENT_ID";
pub const CLIENT_SECRET_VAR: &str = "SPOTIFY_CLIENT_SECRET";
pub const REDIRECT_URI_VAR: &str = "SPOTIFY_REDIRECT_URI";
pub const TOKEN_CACHE_VAR: &str = "SPOTIFY_TOKEN_CACHE";

const DEFAULT_TOKEN_CACHE: &str = ".spotify_token_cache.json";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

/// OAuth credentials and the location where the obtained token is persisted
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub token_cache_path: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenv::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "Loaded .env file"),
            Err(e) => tracing::debug!(error = %e, "No .env file loaded, using process environment"),
        }

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let client_id = required(CLIENT_ID_VAR)?;
        let client_secret = required(CLIENT_SECRET_VAR)?;
        let redirect_uri = required(REDIRECT_URI_VAR)?;

        let token_cache_path = lookup(TOKEN_CACHE_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_TOKEN_CACHE));

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            token_cache_path,
        })
    }
}
