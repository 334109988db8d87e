pub mod defer;
mod env_overrides;
pub mod log;

use config::{Config, File, FileFormat, FileSourceFile};
use envconfig::Envconfig;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::path::PathBuf;

use crate::{
    defer::DeferConfig,
    env_overrides::{EnvVarOverrides, EnvVarOverridesError},
    log::LoggingConfig,
};

#[derive(Debug, Default, Deserialize, Serialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct CollectorConfig {
    /// The logger configuration.
    #[serde(default)]
    pub log: LoggingConfig,

    /// Incremental delivery configuration.
    #[serde(default)]
    pub defer: DeferConfig,
}

#[derive(Debug, thiserror::Error)]
pub enum CollectorConfigError {
    #[error("Failed to load configuration: {0}")]
    ConfigLoadError(#[from] config::ConfigError),
    #[error("Failed to apply configuration overrides: {0}")]
    EnvVarOverridesError(#[from] EnvVarOverridesError),
    #[error("Failed to load the environment variables: {0}")]
    EnvVarLoadError(#[from] envconfig::Error),
    #[error("Failed to parse the configuration file path: {0}")]
    ConfigPathParseError(Infallible),
}

static DEFAULT_FILE_NAMES: &[&str] = &[
    "collector.config.yaml",
    "collector.config.yml",
    "collector.config.json",
    "collector.config.json5",
];

/// Loads the configuration from `override_config_path`, or from the first
/// default file name found in the working directory, then applies the
/// environment overrides.
pub fn load_config(
    override_config_path: Option<String>,
) -> Result<CollectorConfig, CollectorConfigError> {
    let env_overrides = EnvVarOverrides::init_from_env()?;
    build_config(override_config_path, env_overrides)
}

fn build_config(
    override_config_path: Option<String>,
    env_overrides: EnvVarOverrides,
) -> Result<CollectorConfig, CollectorConfigError> {
    let mut config = Config::builder();

    if let Some(path_str) = override_config_path {
        let path_buf = path_str
            .parse::<PathBuf>()
            .map_err(CollectorConfigError::ConfigPathParseError)?;
        let as_file: File<FileSourceFile, _> = path_buf.into();

        config = config.add_source(as_file.required(true));
    } else {
        for name in DEFAULT_FILE_NAMES {
            config = config.add_source(File::with_name(name).required(false));
        }
    }

    config = env_overrides.apply_overrides(config)?;

    Ok(config.build()?.try_deserialize::<CollectorConfig>()?)
}

pub fn parse_yaml_config(config_raw: String) -> Result<CollectorConfig, CollectorConfigError> {
    Config::builder()
        .add_source(File::from_str(&config_raw, FileFormat::Yaml))
        .build()?
        .try_deserialize::<CollectorConfig>()
        .map_err(CollectorConfigError::ConfigLoadError)
}

/// The JSON schema of the configuration file.
pub fn config_json_schema() -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&schemars::schema_for!(CollectorConfig))
}
