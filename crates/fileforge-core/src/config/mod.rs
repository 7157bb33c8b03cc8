//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod converter;
pub mod logging;
pub mod upload;

use serde::{Deserialize, Serialize};
use validator::Validate;

use self::converter::ConverterConfig;
use self::logging::LoggingConfig;
use self::upload::UploadConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay). Every
/// section carries serde defaults, so an absent file yields a fully
/// usable configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Upload validation settings.
    pub upload: UploadConfig,
    /// External converter settings.
    pub converter: ConverterConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `FILEFORGE`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("FILEFORGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.validate_ranges()?;
        Ok(config)
    }

    /// Validate configured numeric ranges.
    pub fn validate_ranges(&self) -> Result<(), AppError> {
        self.converter
            .validate()
            .map_err(|e| AppError::configuration(format!("Invalid converter config: {e}")))?;
        self.upload
            .validate()
            .map_err(|e| AppError::configuration(format!("Invalid upload config: {e}")))
    }
}
