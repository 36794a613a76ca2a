//! Configuration for the preview server.
//!
//! Covers the bind host, the port search window and the directory to serve.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Preview configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// A field has an unusable value
    #[error("Invalid configuration field {field}: {reason}")]
    Invalid {
        /// Field name
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Preview server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    /// Host to bind (e.g., "127.0.0.1")
    pub bind_address: String,

    /// First port tried
    pub start_port: u16,

    /// How many consecutive ports are tried
    pub max_port_attempts: u16,

    /// Directory served at `/`
    pub root_dir: PathBuf,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            start_port: 7000,
            max_port_attempts: 10,
            root_dir: PathBuf::from("output"),
        }
    }
}

impl PreviewConfig {
    /// Default configuration serving `root_dir`
    pub fn for_dir(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    /// Parse and validate configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: PreviewConfig = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "bind_address",
                reason: "must not be empty".to_string(),
            });
        }
        if self.max_port_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "max_port_attempts",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.start_port == 0 {
            return Err(ConfigError::Invalid {
                field: "start_port",
                reason: "port 0 is not a fixed port".to_string(),
            });
        }
        Ok(())
    }

    /// Ports tried, in order
    pub fn candidate_ports(&self) -> impl Iterator<Item = u16> {
        port_window(self.start_port, self.max_port_attempts)
    }
}

/// `start` and the following ports, `attempts` in total, stopping at `u16::MAX`
pub(crate) fn port_window(start: u16, attempts: u16) -> impl Iterator<Item = u16> {
    (0..attempts).map_while(move |offset| start.checked_add(offset))
}
