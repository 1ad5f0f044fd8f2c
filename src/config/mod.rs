//! Tries to create an `AppConfig` from config files and the environment.
//! Sources are layered with `figment`, later sources override earlier ones:
//! `config/base.toml`, `config/{environment}.toml`, `APP_*` variables, `BEEHIIV_*` variables.

mod data;
mod error;

use std::path::Path;

use figment::{
    providers::{Env, Format, Toml},
    value::Uncased,
    Figment,
};
use tracing::info;

pub use data::{AppConfig, BeehiivConfig, Environment, NetConfig};
pub use error::{ConfigError, ConfigResult};

impl AppConfig {
    /// Loads the configuration from the `config` directory in the current working directory.
    /// The environment is read from `APP_ENVIRONMENT` and defaults to `local`.
    pub fn load() -> ConfigResult<Self> {
        let environment: Environment = std::env::var("APP_ENVIRONMENT")
            .unwrap_or_else(|_| "local".into())
            .try_into()?;
        let config_dir = std::env::current_dir()?.join("config");

        info!(
            "{:<12} - Loading the configuration for: {}",
            "load_config",
            environment.as_ref()
        );

        let config: AppConfig = figment(&config_dir, &environment).extract()?;
        config.beehiiv_config.validate()?;

        Ok(config)
    }
}

fn figment(config_dir: &Path, environment: &Environment) -> Figment {
    let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

    Figment::new()
        .merge(Toml::file(config_dir.join("base.toml")))
        .merge(Toml::file(config_dir.join(environment_filename)))
        .merge(Env::prefixed("APP_").split("__"))
        // BEEHIIV_PUBLICATION_ID -> beehiiv_config.publication_id
        .merge(
            Env::prefixed("BEEHIIV_")
                .map(|key| Uncased::from_owned(format!("beehiiv_config.{key}"))),
        )
}
