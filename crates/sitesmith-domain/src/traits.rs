//! Trait definitions for external interactions
//!
//! These traits define the boundaries between domain logic and infrastructure.
//! Infrastructure implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (sitesmith-llm).
///
/// `generate` is blocking. Async callers run it on the blocking pool
/// (`tokio::task::spawn_blocking`), never directly on a runtime worker.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a completion for a single user prompt
    ///
    /// Returns the complete response text; streaming is not part of the contract.
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Name of the model that answers prompts
    fn model_name(&self) -> &str;
}
