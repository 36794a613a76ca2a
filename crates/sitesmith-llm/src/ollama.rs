//! Ollama Provider Implementation
//!
//! Provides integration with Ollama's local LLM API.
//!
//! # Features
//!
//! - Async HTTP communication with the Ollama chat API
//! - Configurable endpoint, model and sampling temperature
//! - Connection retries with exponential backoff (a request the server received is never re-sent)
//! - Model discovery (`/api/tags`) and pulling through the `ollama` CLI
//!
//! # Examples
//!
//! ```no_run
//! use sitesmith_llm::OllamaProvider;
//!
//! # async fn example() -> Result<(), sitesmith_llm::LlmError> {
//! let provider = OllamaProvider::new("http://localhost:11434", "llama3.2:latest")?
//!     .with_temperature(0.8);
//!
//! if !provider.has_model().await? {
//!     provider.pull_model().await?;
//! }
//! let html = provider.chat("Write a hello world page").await?;
//! # Ok(())
//! # }
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use sitesmith_domain::traits::LlmProvider as LlmProviderTrait;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Default Ollama API endpoint
pub const DEFAULT_ENDPOINT: &str = "http://localhost:11434";

/// Default timeout for LLM requests (30 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default number of connection attempts per request
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.8;

/// Ollama API provider for local LLM inference
#[derive(Debug, Clone)]
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
    max_retries: u32,
    temperature: Option<f32>,
}

/// Single chat message
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Sampling options forwarded to the model
#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
}

/// Request body for the Ollama chat API
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<ChatOptions>,
}

/// Response from the Ollama chat API
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
    #[allow(dead_code)]
    #[serde(default)]
    done: bool,
}

/// Response from the Ollama tags API
#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// A locally installed model as reported by `/api/tags`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Display name, e.g. `llama3.2:latest`
    pub name: String,

    /// Model reference; usually equal to `name`
    #[serde(default)]
    pub model: String,

    /// Size on disk in bytes
    #[serde(default)]
    pub size: u64,

    /// Last modification timestamp as reported by Ollama
    #[serde(default)]
    pub modified_at: String,
}

impl ModelInfo {
    /// Case-insensitive substring match against the model reference
    ///
    /// `llama3.2` matches `llama3.2:latest`.
    pub fn matches(&self, wanted: &str) -> bool {
        let wanted = wanted.to_lowercase();
        let reference = if self.model.is_empty() { &self.name } else { &self.model };
        reference.to_lowercase().contains(&wanted)
    }
}

impl OllamaProvider {
    /// Create a new Ollama provider
    ///
    /// # Parameters
    ///
    /// - `endpoint`: Ollama API endpoint (e.g., "http://localhost:11434")
    /// - `model`: Model to use (e.g., "llama3.2:latest", "deepseek-r1:7b")
    ///
    /// # Errors
    ///
    /// Returns `LlmError::Other` if the HTTP client cannot be built.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Result<Self, LlmError> {
        Self::with_timeout(endpoint, model, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Create a new Ollama provider with an explicit request timeout
    pub fn with_timeout(
        endpoint: impl Into<String>,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint: String = endpoint.into();
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.into(),
            client,
            max_retries: DEFAULT_MAX_RETRIES,
            temperature: Some(DEFAULT_TEMPERATURE),
        })
    }

    /// Create a new Ollama provider on `http://localhost:11434`
    pub fn default_endpoint(model: impl Into<String>) -> Result<Self, LlmError> {
        Self::new(DEFAULT_ENDPOINT, model)
    }

    /// Set the maximum number of connection attempts
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries.max(1);
        self
    }

    /// Set the sampling temperature (`None` leaves the model default)
    pub fn with_temperature(mut self, temperature: impl Into<Option<f32>>) -> Self {
        self.temperature = temperature.into();
        self
    }

    /// API endpoint this provider talks to
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Model used for completions
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user message to the chat API and return the reply text
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Ollama is not running
    /// - Model is not available
    /// - The server cannot be reached after all connection attempts
    /// - The request times out or the server answers with an error status
    /// - Response format is invalid
    pub async fn chat(&self, prompt: &str) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.endpoint);

        let request_body = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt.to_string(),
            }],
            stream: false,
            options: self.temperature.map(|temperature| ChatOptions { temperature }),
        };

        // Only sends that never reached the server are repeated; anything
        // the server may have started generating is returned as is.
        let mut attempts = 0;

        loop {
            attempts += 1;
            let response = match self.client.post(&url).json(&request_body).send().await {
                Ok(response) => response,
                Err(e) if e.is_connect() && attempts < self.max_retries => {
                    warn!(
                        "Ollama connection failed (attempt {}/{}): {}",
                        attempts, self.max_retries, e
                    );
                    // Exponential backoff: 1s, 2s, 4s, etc.
                    tokio::time::sleep(Duration::from_secs(2u64.pow(attempts - 1))).await;
                    continue;
                }
                Err(e) => {
                    return Err(LlmError::Communication(format!("Request failed: {}", e)));
                }
            };

            let status = response.status();
            if status.is_success() {
                let chat_response = response.json::<ChatResponse>().await.map_err(|e| {
                    LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                })?;
                let content = chat_response.message.content;
                debug!(
                    "Raw model response ({} chars): {}",
                    content.len(),
                    truncate_for_log(&content, 500)
                );
                return Ok(content);
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(LlmError::ModelNotAvailable(self.model.clone()));
            }

            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::Communication(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }
    }

    /// List locally installed models
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, LlmError> {
        let url = format!("{}/api/tags", self.endpoint);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| LlmError::Communication(format!("Ollama server not reachable: {}", e)))?;

        if !response.status().is_success() {
            return Err(LlmError::Communication(format!(
                "HTTP {} from {}",
                response.status(),
                url
            )));
        }

        let tags = response
            .json::<TagsResponse>()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("Failed to parse model list: {}", e)))?;

        Ok(tags.models)
    }

    /// Whether the Ollama server answers at all
    pub async fn is_reachable(&self) -> bool {
        self.list_models().await.is_ok()
    }

    /// Whether the configured model is installed
    pub async fn has_model(&self) -> Result<bool, LlmError> {
        let models = self.list_models().await?;
        let found = models.iter().find(|m| m.matches(&self.model));
        if let Some(model) = found {
            debug!("Found model {} matching {}", model.name, self.model);
        }
        Ok(found.is_some())
    }

    /// Pull the configured model with `ollama pull`
    ///
    /// The pull is retried with the same backoff as chat requests.
    ///
    /// # Errors
    ///
    /// `LlmError::ToolNotFound` when the `ollama` binary is not on `PATH`,
    /// `LlmError::PullFailed` when every attempt exits unsuccessfully.
    pub async fn pull_model(&self) -> Result<(), LlmError> {
        let binary = find_ollama_binary()?;
        info!("Pulling model {} with {}", self.model, binary.display());

        let mut attempts = 0;
        let mut last_error = String::new();

        while attempts < self.max_retries {
            let output = tokio::process::Command::new(&binary)
                .arg("pull")
                .arg(&self.model)
                .output()
                .await?;

            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            debug!("Pull command output: {}\nErrors: {}", stdout, stderr);

            if output.status.success() {
                return Ok(());
            }

            last_error = stderr.trim().to_string();
            attempts += 1;
            warn!(
                "Failed to pull model {} (attempt {}/{}): {}",
                self.model, attempts, self.max_retries, last_error
            );
            if attempts < self.max_retries {
                tokio::time::sleep(Duration::from_secs(2u64.pow(attempts - 1))).await;
            }
        }

        Err(LlmError::PullFailed {
            model: self.model.clone(),
            stderr: last_error,
        })
    }
}

impl LlmProviderTrait for OllamaProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        // Blocking wrapper: reuse the ambient runtime from a blocking-pool
        // thread, otherwise spin up a private one.
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle.block_on(self.chat(prompt)),
            Err(_) => tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
                .block_on(self.chat(prompt)),
        }
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Locate the `ollama` executable on `PATH`
pub fn find_ollama_binary() -> Result<PathBuf, LlmError> {
    which::which("ollama").map_err(|_| {
        LlmError::ToolNotFound(
            "ollama command not found. Install Ollama from https://ollama.com and ensure it is in your PATH"
                .to_string(),
        )
    })
}

fn truncate_for_log(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let head: String = text.chars().take(max_chars).collect();
    format!("{}... (truncated)", head)
}
