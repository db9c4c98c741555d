//! Configuration errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a Pulsewatch config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No file at the given path.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid config format: {0}")]
    InvalidFormat(String),

    /// A value was rejected by the validator. `field` is a dotted path such
    /// as `scheduler.max_jobs_allowed`.
    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// A `${VAR}` reference names an unset environment variable.
    #[error("Environment variable '{0}' referenced in config is not set")]
    EnvVarNotSet(String),

    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed TOML: {0}")]
    TomlParse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Dotted path of the offending field, for validation failures.
    pub fn field(&self) -> Option<&str> {
        match self {
            ConfigError::InvalidValue { field, .. } => Some(field),
            _ => None,
        }
    }
}
