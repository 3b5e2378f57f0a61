use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ApiBaseUrl,
    ApiToken,
    PollIntervalSecs,
    RequestTimeoutSecs,
    ScriptId,
    ProjectId,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ApiBaseUrl => "VIDEO_API_BASE_URL",
            EnvKey::ApiToken => "VIDEO_API_TOKEN",
            EnvKey::PollIntervalSecs => "VIDEO_POLL_INTERVAL_SECS",
            EnvKey::RequestTimeoutSecs => "VIDEO_REQUEST_TIMEOUT_SECS",
            EnvKey::ScriptId => "VIDEO_SCRIPT_ID",
            EnvKey::ProjectId => "VIDEO_PROJECT_ID",
        }
    }
}

pub fn get(key: EnvKey) -> Result<String, env::VarError> {
    env::var(key.as_str())
}

pub fn get_opt(key: EnvKey) -> Option<String> {
    env::var(key.as_str()).ok().filter(|v| !v.trim().is_empty())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match get(key) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
