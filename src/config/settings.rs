use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::env::{self, EnvKey};

pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 10;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing environment variable {0}")]
    Missing(&'static str),

    #[error("Invalid URL in {key}: {source}")]
    InvalidUrl {
        key: &'static str,
        source: url::ParseError,
    },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    /// Backend root; every endpoint path is resolved against it.
    pub api_base_url: Url,
    pub api_token: Option<String>,
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    pub script_id: Option<i64>,
    pub project_id: Option<i64>,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let raw_url =
            env::get(EnvKey::ApiBaseUrl).map_err(|_| ConfigError::Missing(EnvKey::ApiBaseUrl.as_str()))?;

        let mut config = Self::with_base_url(&raw_url)?;
        config.api_token = env::get_opt(EnvKey::ApiToken);
        config.poll_interval = Duration::from_secs(
            env::get_parsed(EnvKey::PollIntervalSecs, DEFAULT_POLL_INTERVAL_SECS).max(1),
        );
        config.request_timeout = Duration::from_secs(
            env::get_parsed(EnvKey::RequestTimeoutSecs, DEFAULT_REQUEST_TIMEOUT_SECS).max(1),
        );
        config.script_id = parse_id(EnvKey::ScriptId)?;
        config.project_id = parse_id(EnvKey::ProjectId)?;

        Ok(config)
    }

    /// Defaults for everything except the backend location.
    pub fn with_base_url(raw: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base_url: normalize_base_url(raw)?,
            api_token: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            script_id: None,
            project_id: None,
        })
    }
}

fn parse_id(key: EnvKey) -> Result<Option<i64>, ConfigError> {
    let name = key.as_str();
    match env::get_opt(key) {
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { key: name, value }),
        None => Ok(None),
    }
}

// Url::join drops the last path segment unless the base ends with '/'.
fn normalize_base_url(raw: &str) -> Result<Url, ConfigError> {
    let mut url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidUrl {
        key: EnvKey::ApiBaseUrl.as_str(),
        source,
    })?;

    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }

    Ok(url)
}
