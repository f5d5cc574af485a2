use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_API_BASE: &str = "https://cliqtrix-backend.onrender.com";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 20;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_base: Url,
    pub port: u16,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, url::ParseError> {
        Ok(Self {
            api_base: resolve_api_base()?,
            port: resolve_port(),
            request_timeout: resolve_request_timeout(),
        })
    }
}

pub fn resolve_api_base() -> Result<Url, url::ParseError> {
    let raw = env::var("TASKFLOW_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
    Url::parse(raw.trim())
}

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// Upper bound on a single backend request, so a hung backend ends in an error
/// state instead of a spinner that never clears.
pub fn resolve_request_timeout() -> Duration {
    let secs = env::var("TASKFLOW_REQUEST_TIMEOUT_SECS")
        .ok()
        .and_then(|value| value.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
