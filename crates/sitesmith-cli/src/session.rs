//! Per-run session state, passed explicitly to every command.

use sitesmith_preview::PreviewServer;
use std::collections::{HashSet, VecDeque};
use tracing::debug;

/// Number of prompts kept by default
pub const PROMPT_HISTORY_LIMIT: usize = 10;

/// Recent site descriptions, most recent first
///
/// A prompt already present is not recorded again.
#[derive(Debug, Clone)]
pub struct PromptHistory {
    entries: VecDeque<String>,
    capacity: usize,
}

impl PromptHistory {
    /// Empty history holding at most `capacity` prompts
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a prompt; returns whether it was added
    pub fn record(&mut self, prompt: &str) -> bool {
        let prompt = prompt.trim();
        if prompt.is_empty() || self.entries.iter().any(|p| p == prompt) {
            return false;
        }
        self.entries.push_front(prompt.to_string());
        self.entries.truncate(self.capacity);
        true
    }

    /// Prompt at `index` (0 = most recent)
    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Iterate prompts, most recent first
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// Number of prompts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no prompt was recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for PromptHistory {
    fn default() -> Self {
        Self::new(PROMPT_HISTORY_LIMIT)
    }
}

/// State that outlives a single command
#[derive(Debug, Default)]
pub struct SessionContext {
    /// Models whose availability was already checked in this session
    confirmed_models: HashSet<String>,

    /// Site descriptions
    pub prompt_history: PromptHistory,

    /// Page tasks, in submission order without duplicates
    pub task_history: Vec<String>,

    /// Running preview server, if any
    pub preview: Option<PreviewServer>,
}

impl SessionContext {
    /// Fresh session
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `model` was already found or pulled in this session
    pub fn is_model_confirmed(&self, model: &str) -> bool {
        self.confirmed_models.contains(model)
    }

    /// Mark `model` as available
    pub fn confirm_model(&mut self, model: &str) {
        self.confirmed_models.insert(model.to_string());
    }

    /// Forget that `model` was checked; returns whether it was confirmed
    pub fn forget_model(&mut self, model: &str) -> bool {
        self.confirmed_models.remove(model)
    }

    /// Record a page task
    pub fn record_task(&mut self, task: &str) {
        if !self.task_history.iter().any(|t| t == task) {
            self.task_history.push(task.to_string());
        }
    }

    /// Stop the running preview; returns whether one was running
    pub async fn stop_preview(&mut self) -> bool {
        match self.preview.take() {
            Some(server) => {
                debug!("Stopping preview on port {}", server.port());
                server.stop().await;
                true
            }
            None => false,
        }
    }

    /// URL of the running preview
    pub fn preview_url(&self) -> Option<String> {
        self.preview.as_ref().map(PreviewServer::url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_most_recent_first() {
        let mut history = PromptHistory::default();
        assert!(history.record("a blog"));
        assert!(history.record("a shop"));
        assert_eq!(history.get(0), Some("a shop"));
        assert_eq!(history.get(1), Some("a blog"));
    }

    #[test]
    fn test_history_ignores_duplicates_and_blanks() {
        let mut history = PromptHistory::default();
        history.record("a blog");
        assert!(!history.record("a blog"));
        assert!(!history.record("  a blog "));
        assert!(!history.record("   "));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_history_capacity() {
        let mut history = PromptHistory::default();
        for i in 0..15 {
            history.record(&format!("prompt {}", i));
        }
        assert_eq!(history.len(), PROMPT_HISTORY_LIMIT);
        assert_eq!(history.get(0), Some("prompt 14"));
        assert_eq!(history.iter().last(), Some("prompt 5"));
    }

    #[test]
    fn test_task_history() {
        let mut session = SessionContext::new();
        session.record_task("todo list");
        session.record_task("stopwatch");
        session.record_task("todo list");
        assert_eq!(session.task_history, vec!["todo list", "stopwatch"]);
    }

    #[test]
    fn test_models_confirmed_by_name() {
        let mut session = SessionContext::new();
        session.confirm_model("deepseek-r1:7b");

        assert!(session.is_model_confirmed("deepseek-r1:7b"));
        assert!(!session.is_model_confirmed("llama3.2:latest"));

        assert!(session.forget_model("deepseek-r1:7b"));
        assert!(!session.forget_model("deepseek-r1:7b"));
        assert!(!session.is_model_confirmed("deepseek-r1:7b"));
    }

    #[tokio::test]
    async fn test_stop_without_preview() {
        let mut session = SessionContext::new();
        assert!(!session.stop_preview().await);
        assert!(session.preview_url().is_none());
    }
}
