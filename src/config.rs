use std::net::SocketAddr;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_ADDR: &str = "0.0.0.0:3000";

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const MODEL_VAR: &str = "OPENAI_MODEL";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const ADDR_VAR: &str = "KIDSHORTS_ADDR";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid listen address {value:?} in KIDSHORTS_ADDR: {reason}")]
    InvalidAddr { value: String, reason: String },
}

/// Settings read from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `None` leaves the server up but generation disabled.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub addr: SocketAddr,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Blank values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let addr_value = get(ADDR_VAR).unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidAddr {
                value: addr_value.clone(),
                reason: e.to_string(),
            })?;

        Ok(Self {
            api_key: get(API_KEY_VAR),
            model: get(MODEL_VAR).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            addr,
        })
    }
}
