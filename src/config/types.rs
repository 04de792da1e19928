//! The configuration structs used to build the AppConfig, and their impls.
use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
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
    pub store_config: StoreConfig,
}

#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct NetConfig {
    pub host: [u8; 4],
    pub app_port: u16,
}

/// Where the subscriber list lives on disk.
#[derive(Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StoreConfig {
    pub path: PathBuf,
}

// ###################################
// ->   IMPLs
// ###################################
impl AppConfig {
    /// Env variables with this prefix override values from the files.
    /// Nested keys are separated by a double underscore: `APP_NET_CONFIG__APP_PORT=8080`.
    pub const ENV_PREFIX: &'static str = "APP_";

    /// Builds the config from `base.toml` and `{environment}.toml` inside `config_dir`,
    /// with `APP_` env variables layered on top.
    pub fn load_from(config_dir: &Path, environment: Environment) -> ConfigResult<Self> {
        if !config_dir.is_dir() {
            return Err(ConfigError::MissingConfigDir(
                config_dir.display().to_string(),
            ));
        }

        let environment_filename = format!("{}.toml", environment.as_ref().to_lowercase());

        let app_config = Figment::new()
            .merge(Toml::file(config_dir.join("base.toml")))
            .merge(Toml::file(config_dir.join(environment_filename)))
            .merge(Env::prefixed(Self::ENV_PREFIX).split("__"))
            .extract()?;

        Ok(app_config)
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
