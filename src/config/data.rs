//! The configuration structs used to build the AppConfig, and their impls.
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use strum_macros::AsRefStr;

use crate::config::{ConfigError, ConfigResult};

// ###################################
// ->   STRUCTS
// ###################################
#[derive(AsRefStr, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

#[derive(Deserialize, Clone, Debug)]
pub struct AppConfig {
    pub net_config: NetConfig,
    pub beehiiv_config: BeehiivConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

/// Everything needed to talk to the beehiiv subscriptions API.
/// Neither `publication_id` nor `api_key` may ever be logged.
#[derive(Deserialize, Clone, Debug)]
pub struct BeehiivConfig {
    pub base_url: String,
    pub publication_id: SecretString,
    pub api_key: SecretString,
    pub timeout_millis: u64,
}

// ###################################
// ->   IMPLs
// ###################################
impl BeehiivConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_millis)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.publication_id.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingSecret("publication_id"));
        }
        if self.api_key.expose_secret().trim().is_empty() {
            return Err(ConfigError::MissingSecret("api_key"));
        }
        Ok(())
    }
}

// ###################################
// ->   TRY FROMs
// ###################################

impl TryFrom<String> for Environment {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            _ => Err(Self::Error::StringToEnvironmentFail(value)),
        }
    }
}

// ###################################
// ->   TESTS
// ###################################
