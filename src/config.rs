use std::env;

use crate::error::ConfigError;

pub const TOKEN_VAR: &str = "TELOXIDE_TOKEN";
pub const STORE_CREDENTIALS_VAR: &str = "PROFILE_STORE_CREDENTIALS";

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub bot_token: String,
    /// JSON blob handed to the profile store. `None` leaves the store isolated.
    pub store_credentials: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let bot_token = lookup(TOKEN_VAR)
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(TOKEN_VAR.to_string()))?;

        let store_credentials =
            lookup(STORE_CREDENTIALS_VAR).filter(|blob| !blob.trim().is_empty());

        Ok(Config {
            bot_token,
            store_credentials,
        })
    }
}
