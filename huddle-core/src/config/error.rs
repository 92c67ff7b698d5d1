//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed TOML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("cannot encode configuration as TOML: {0}")]
    Encode(#[from] toml::ser::Error),

    /// An environment override that does not parse
    #[error("{key}={value:?} is not a boolean")]
    InvalidEnv { key: &'static str, value: String },

    #[error("{field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

impl ConfigError {
    /// Name of the setting at fault, if the error is about one setting
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ConfigError::InvalidEnv { key, .. } => Some(*key),
            ConfigError::Invalid { field, .. } => Some(*field),
            _ => None,
        }
    }
}
