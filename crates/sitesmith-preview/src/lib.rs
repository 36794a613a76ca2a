//! Sitesmith Preview
//!
//! Local static file server for generated sites.
//! Picks the first free port from a configured window and serves the output
//! directory until stopped.

#![warn(missing_docs)]

pub mod config;
pub mod server;

pub use config::PreviewConfig;
pub use server::{create_router, find_free_port, PreviewServer};

use std::path::PathBuf;

/// Preview error
#[derive(Debug, thiserror::Error)]
pub enum PreviewError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Directory to serve does not exist
    #[error("Directory '{}' does not exist", .0.display())]
    RootNotFound(PathBuf),

    /// Every candidate port is taken
    #[error("No free port on {host} in {start}..+{attempts}")]
    NoFreePort {
        /// Bind host
        host: String,
        /// First port tried
        start: u16,
        /// Ports tried
        attempts: u16,
    },

    /// Server binding error
    #[error("Failed to bind server: {0}")]
    Bind(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PreviewError::NoFreePort {
            host: "127.0.0.1".to_string(),
            start: 7000,
            attempts: 10,
        };
        assert_eq!(err.to_string(), "No free port on 127.0.0.1 in 7000..+10");

        let err = PreviewError::RootNotFound(PathBuf::from("output"));
        assert_eq!(err.to_string(), "Directory 'output' does not exist");
    }
}
