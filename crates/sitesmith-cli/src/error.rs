//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Ollama server did not answer
    #[error("Ollama server not running at {0}. Start it with `ollama serve`.")]
    OllamaUnavailable(String),

    /// Model still missing after a pull
    #[error("Model {0} not detected after pulling. Verify with `ollama list`.")]
    ModelMissing(String),

    /// LLM error
    #[error("LLM error: {0}")]
    Llm(#[from] sitesmith_llm::LlmError),

    /// Extractor setup error
    #[error("Extractor error: {0}")]
    Extractor(#[from] sitesmith_extractor::ExtractorError),

    /// Preview server error
    #[error("Preview error: {0}")]
    Preview(#[from] sitesmith_preview::PreviewError),

    /// A generated file would be empty
    #[error("{0} content is empty")]
    EmptyArtifact(String),

    /// Target directory cannot be written
    #[error("Directory '{}' is not writable", .0.display())]
    NotWritable(PathBuf),

    /// No usable VS Code command line
    #[error("VS Code CLI not found. Ensure 'code' is in your PATH (run 'code --version' to verify).")]
    EditorNotFound,

    /// An external command ran but failed
    #[error("{command} failed: {stderr}")]
    CommandFailed {
        /// Command that was run
        command: String,
        /// Captured standard error
        stderr: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
