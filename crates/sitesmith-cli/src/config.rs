//! Configuration management for the CLI.

use crate::error::{CliError, Result};
use serde::{Deserialize, Serialize};
use sitesmith_extractor::ExtractorConfig;
use sitesmith_llm::ollama::{
    DEFAULT_ENDPOINT, DEFAULT_MAX_RETRIES, DEFAULT_TEMPERATURE, DEFAULT_TIMEOUT_SECS,
};
use sitesmith_llm::OllamaProvider;
use sitesmith_preview::PreviewConfig;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Ollama connection and model selection
    #[serde(default)]
    pub ollama: OllamaSettings,

    /// Preview server; `root_dir` is where sites are written
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Page workspace and editor
    #[serde(default)]
    pub workspace: WorkspaceSettings,

    /// Response extraction and retry behavior
    #[serde(default)]
    pub extractor: ExtractorConfig,

    /// Global settings
    #[serde(default)]
    pub settings: Settings,
}

/// Ollama settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaSettings {
    /// API endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model used for multi-file sites
    #[serde(default = "default_site_model")]
    pub site_model: String,

    /// Model used for single pages
    #[serde(default = "default_page_model")]
    pub page_model: String,

    /// Sampling temperature for site generation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// HTTP timeout per request in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Send attempts per request
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
}

/// Page workspace settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSettings {
    /// Directory holding generated pages
    #[serde(default = "default_workspace_dir")]
    pub dir: PathBuf,

    /// VS Code command candidates, tried in order
    #[serde(default = "default_editor_commands")]
    pub editor_commands: Vec<String>,
}

/// Global CLI settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Enable colored output
    #[serde(default = "default_true")]
    pub color: bool,

    /// Default output format
    #[serde(default = "default_format")]
    pub format: OutputFormat,

    /// Command history size
    #[serde(default = "default_history_size")]
    pub history_size: usize,

    /// Write logs to this file instead of stderr
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<PathBuf>,
}

/// Output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Table format
    Table,
    /// JSON format
    Json,
    /// Quiet (minimal) format
    Quiet,
}

impl Config {
    /// Get the configuration file path.
    pub fn path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// `~/.sitesmith`
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| CliError::Config("Could not find home directory".into()))?;
        Ok(home.join(".sitesmith"))
    }

    /// Load configuration from the default path or create default.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load configuration from `path`, falling back to defaults if absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)?;
            Self::from_toml(&contents)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a file that must exist.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(CliError::Config(format!(
                "Config file not found: {}",
                path.display()
            )));
        }
        Self::from_toml(&fs::read_to_string(path)?)
    }

    /// Parse and validate configuration.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to the default path.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Save configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| CliError::Config(format!("Failed to serialize config: {}", e)))?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Check every section.
    pub fn validate(&self) -> Result<()> {
        self.extractor.validate().map_err(CliError::Config)?;
        self.preview
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        if self.ollama.site_model.trim().is_empty() || self.ollama.page_model.trim().is_empty() {
            return Err(CliError::Config("model names must not be empty".into()));
        }
        if self.ollama.timeout_secs == 0 {
            return Err(CliError::Config("ollama.timeout_secs must be greater than 0".into()));
        }
        Ok(())
    }

    /// Provider for multi-file sites.
    pub fn site_provider(&self, model: Option<&str>) -> Result<OllamaProvider> {
        let model = model.unwrap_or(&self.ollama.site_model);
        Ok(self.provider(model)?.with_temperature(self.ollama.temperature))
    }

    /// Provider for single pages.
    pub fn page_provider(&self, model: Option<&str>) -> Result<OllamaProvider> {
        let model = model.unwrap_or(&self.ollama.page_model);
        Ok(self.provider(model)?.with_temperature(None))
    }

    fn provider(&self, model: &str) -> Result<OllamaProvider> {
        Ok(OllamaProvider::with_timeout(
            &self.ollama.endpoint,
            model,
            Duration::from_secs(self.ollama.timeout_secs),
        )?
        .with_max_retries(self.ollama.max_retries))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ollama: OllamaSettings::default(),
            preview: PreviewConfig::default(),
            workspace: WorkspaceSettings::default(),
            extractor: ExtractorConfig::default(),
            settings: Settings::default(),
        }
    }
}

impl Default for OllamaSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            site_model: default_site_model(),
            page_model: default_page_model(),
            temperature: Some(DEFAULT_TEMPERATURE),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
        }
    }
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            dir: default_workspace_dir(),
            editor_commands: default_editor_commands(),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            color: true,
            format: OutputFormat::Table,
            history_size: 1000,
            log_file: None,
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_site_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_page_model() -> String {
    "deepseek-r1:7b".to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_workspace_dir() -> PathBuf {
    PathBuf::from("workspace")
}

fn default_editor_commands() -> Vec<String> {
    let mut commands = vec!["code".to_string()];
    if cfg!(target_os = "windows") {
        commands.push(r"C:\Program Files\Microsoft VS Code\bin\code.cmd".to_string());
        if let Some(local) = dirs::data_local_dir() {
            commands.push(
                local
                    .join(r"Programs\Microsoft VS Code\bin\code.cmd")
                    .display()
                    .to_string(),
            );
        }
    } else if cfg!(target_os = "macos") {
        commands.push(
            "/Applications/Visual Studio Code.app/Contents/Resources/app/bin/code".to_string(),
        );
    } else {
        commands.push("/usr/bin/code".to_string());
        commands.push("/snap/bin/code".to_string());
    }
    commands
}

fn default_true() -> bool {
    true
}

fn default_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_history_size() -> usize {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.ollama.endpoint, "http://localhost:11434");
        assert_eq!(config.ollama.site_model, "llama3.2:latest");
        assert_eq!(config.ollama.page_model, "deepseek-r1:7b");
        assert_eq!(config.preview.start_port, 7000);
        assert_eq!(config.preview.root_dir, PathBuf::from("output"));
        assert_eq!(config.workspace.dir, PathBuf::from("workspace"));
        assert_eq!(config.workspace.editor_commands[0], "code");
        assert!(config.settings.color);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_requires_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");

        assert!(matches!(Config::from_file(&path), Err(CliError::Config(_))));
        assert!(Config::load_from(&path).is_ok());

        Config::default().save_to(&path).unwrap();
        assert_eq!(
            Config::from_file(&path).unwrap().ollama.site_model,
            "llama3.2:latest"
        );
    }

    #[test]
    fn test_partial_toml() {
        let toml = r#"
            [ollama]
            site_model = "qwen2.5-coder:7b"

            [preview]
            start_port = 8100

            [extractor]
            retry_on_failure = false

            [settings]
            format = "json"
            log_file = "/tmp/sitesmith.log"
        "#;

        let config = Config::from_toml(toml).unwrap();
        assert_eq!(config.ollama.site_model, "qwen2.5-coder:7b");
        assert_eq!(config.ollama.page_model, "deepseek-r1:7b");
        assert_eq!(config.preview.start_port, 8100);
        assert_eq!(config.preview.max_port_attempts, 10);
        assert!(!config.extractor.retry_on_failure);
        assert_eq!(config.extractor.reasoning_open_tag, "<think>");
        assert_eq!(config.settings.format, OutputFormat::Json);
        assert_eq!(
            config.settings.log_file,
            Some(PathBuf::from("/tmp/sitesmith.log"))
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Config::from_toml("[extractor]\ngeneration_timeout_secs = 0").is_err());
        assert!(Config::from_toml("[preview]\nmax_port_attempts = 0").is_err());
        assert!(Config::from_toml("[ollama]\nsite_model = \"\"").is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.ollama.page_model = "codellama:7b".to_string();
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.ollama.page_model, "codellama:7b");
        assert_eq!(loaded.ollama.temperature, Some(DEFAULT_TEMPERATURE));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.ollama.site_model, "llama3.2:latest");
    }

    #[test]
    fn test_providers_use_configured_models() {
        let config = Config::default();
        assert_eq!(config.site_provider(None).unwrap().model(), "llama3.2:latest");
        assert_eq!(config.page_provider(None).unwrap().model(), "deepseek-r1:7b");
        assert_eq!(
            config.site_provider(Some("mistral")).unwrap().model(),
            "mistral"
        );
    }
}
