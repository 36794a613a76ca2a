//! Configuration for the Extractor and the generation retry policy

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the Extractor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Tag opening a reasoning block that is removed before parsing
    pub reasoning_open_tag: String,

    /// Tag closing a reasoning block
    pub reasoning_close_tag: String,

    /// Extension appended to normalized filenames (without the dot)
    pub filename_extension: String,

    /// Issue one repeat request when the first response fails extraction
    pub retry_on_failure: bool,

    /// Maximum time for a single model call (seconds)
    pub generation_timeout_secs: u64,
}

impl ExtractorConfig {
    /// Get the generation timeout as a Duration
    pub fn generation_timeout(&self) -> Duration {
        Duration::from_secs(self.generation_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.reasoning_open_tag.is_empty() || self.reasoning_close_tag.is_empty() {
            return Err("reasoning tags must not be empty".to_string());
        }
        if self.reasoning_open_tag == self.reasoning_close_tag {
            return Err("reasoning open and close tags must differ".to_string());
        }
        if self.filename_extension.is_empty()
            || !self
                .filename_extension
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        {
            return Err(format!(
                "filename_extension must be lower-case alphanumeric, got '{}'",
                self.filename_extension
            ));
        }
        if self.generation_timeout_secs == 0 {
            return Err("generation_timeout_secs must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Single-shot preset: no repeat request, fail fast
    pub fn single_shot() -> Self {
        Self {
            retry_on_failure: false,
            generation_timeout_secs: 60,
            ..Self::default()
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            reasoning_open_tag: "<think>".to_string(),
            reasoning_close_tag: "</think>".to_string(),
            filename_extension: "html".to_string(),
            retry_on_failure: true,
            generation_timeout_secs: 120,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ExtractorConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.retry_on_failure);
    }

    #[test]
    fn test_single_shot_config_is_valid() {
        let config = ExtractorConfig::single_shot();
        assert!(config.validate().is_ok());
        assert!(!config.retry_on_failure);
    }

    #[test]
    fn test_invalid_extension() {
        let mut config = ExtractorConfig::default();
        config.filename_extension = ".html".to_string();
        assert!(config.validate().is_err());

        config.filename_extension = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_identical_tags_rejected() {
        let mut config = ExtractorConfig::default();
        config.reasoning_close_tag = config.reasoning_open_tag.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_timeout() {
        let mut config = ExtractorConfig::default();
        config.generation_timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ExtractorConfig::from_toml("filename_extension = \"htm\"").unwrap();
        assert_eq!(config.filename_extension, "htm");
        assert_eq!(config.reasoning_open_tag, "<think>");
        assert!(config.retry_on_failure);
    }

    #[test]
    fn test_toml_round_trip() {
        let config = ExtractorConfig::single_shot();
        let toml_str = config.to_toml().unwrap();
        let parsed = ExtractorConfig::from_toml(&toml_str).unwrap();
        assert_eq!(config, parsed);
    }
}
