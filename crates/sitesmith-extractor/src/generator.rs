//! Generation driver: prompt, model call, extraction, bounded retry

use crate::config::ExtractorConfig;
use crate::error::{ExtractionFailure, ExtractorError, FailureReason};
use crate::parser::ResponseExtractor;
use crate::prompt::{filename_prompt, page_code_prompt, PromptBuilder};
use crate::templates::FRAMEWORK_CSS_PLACEHOLDER;
use crate::types::{SectionSchema, SingleMode};
use sitesmith_domain::traits::LlmProvider;
use sitesmith_domain::{GenerationRequest, SiteArtifact};
use std::sync::{Arc, LazyLock};
use tokio::time::timeout;
use tracing::{debug, info, warn};

static FRAMEWORK_SITE_SCHEMA: LazyLock<SectionSchema> = LazyLock::new(|| {
    SectionSchema::site()
        .allow_blank("css")
        .expect("css is a site section")
});

/// Upper bound on model calls per logical generation
pub const MAX_MODEL_CALLS: u8 = 2;

/// Progress of one logical generation
///
/// `Requested → AwaitingResponse → {Extracted | FailedOnce →
/// AwaitingRetryResponse → {Extracted | FailedFinal}}`. A provider error in
/// either awaiting state goes straight to `FailedFinal`.
#[derive(Debug)]
pub enum AttemptState<T> {
    /// Prompt built, nothing sent yet
    Requested,
    /// First model call in flight
    AwaitingResponse,
    /// First response failed extraction
    FailedOnce(ExtractionFailure),
    /// Second and last model call in flight
    AwaitingRetryResponse,
    /// Terminal: a validated value
    Extracted(T),
    /// Terminal: the caller must fall back
    FailedFinal(FailureReason),
}

impl<T> AttemptState<T> {
    /// Short state name for logs
    pub fn name(&self) -> &'static str {
        match self {
            AttemptState::Requested => "Requested",
            AttemptState::AwaitingResponse => "AwaitingResponse",
            AttemptState::FailedOnce(_) => "FailedOnce",
            AttemptState::AwaitingRetryResponse => "AwaitingRetryResponse",
            AttemptState::Extracted(_) => "Extracted",
            AttemptState::FailedFinal(_) => "FailedFinal",
        }
    }
}

/// Terminal outcome of a generation
#[derive(Debug, Clone, PartialEq)]
pub enum Generation<T> {
    /// A validated value
    Extracted {
        /// The value
        value: T,
        /// Model calls made (1 or 2)
        attempts: u8,
    },
    /// No usable response within the budget
    FailedFinal {
        /// Last failure seen
        reason: FailureReason,
        /// Model calls made (1 or 2)
        attempts: u8,
    },
}

impl<T> Generation<T> {
    /// Model calls made
    pub fn attempts(&self) -> u8 {
        match self {
            Generation::Extracted { attempts, .. } | Generation::FailedFinal { attempts, .. } => {
                *attempts
            }
        }
    }

    /// Whether a value was extracted
    pub fn is_extracted(&self) -> bool {
        matches!(self, Generation::Extracted { .. })
    }

    /// The extracted value, if any
    pub fn value(self) -> Option<T> {
        match self {
            Generation::Extracted { value, .. } => Some(value),
            Generation::FailedFinal { .. } => None,
        }
    }

    /// Substitute a caller-supplied default on failure
    ///
    /// The failure reason stays visible on the result so it can be reported.
    pub fn or_fallback(self, fallback: impl FnOnce() -> T) -> Resolved<T> {
        match self {
            Generation::Extracted { value, attempts } => Resolved {
                value,
                attempts,
                fallback_reason: None,
            },
            Generation::FailedFinal { reason, attempts } => Resolved {
                value: fallback(),
                attempts,
                fallback_reason: Some(reason),
            },
        }
    }
}

/// A generation with any fallback already applied
#[derive(Debug, Clone, PartialEq)]
pub struct Resolved<T> {
    /// Generated or fallback value
    pub value: T,
    /// Model calls made
    pub attempts: u8,
    /// Set when `value` is the fallback
    pub fallback_reason: Option<FailureReason>,
}

impl<T> Resolved<T> {
    /// Whether the fallback was used
    pub fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// Drives prompts through a provider and the extractor
pub struct SiteGenerator<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    extractor: ResponseExtractor,
    config: ExtractorConfig,
}

impl<L> SiteGenerator<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new generator
    pub fn new(llm_provider: L, config: ExtractorConfig) -> Result<Self, ExtractorError> {
        Self::from_shared(Arc::new(llm_provider), config)
    }

    /// Create a generator around an already shared provider
    pub fn from_shared(
        llm_provider: Arc<L>,
        config: ExtractorConfig,
    ) -> Result<Self, ExtractorError> {
        let extractor = ResponseExtractor::new(&config)?;
        Ok(Self {
            llm_provider,
            extractor,
            config,
        })
    }

    /// The extractor used for every response
    pub fn extractor(&self) -> &ResponseExtractor {
        &self.extractor
    }

    /// The provider behind this generator
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Generate `index.html`, `styles.css` and `script.js` for a request
    ///
    /// With a CSS framework selected the CSS section may come back blank; it
    /// is then replaced with a placeholder comment.
    pub async fn generate_site(&self, request: &GenerationRequest) -> Generation<SiteArtifact> {
        let prompt = PromptBuilder::new(request).build();
        let framework = request.framework();

        info!(
            "Generating site (style: {}, framework: {}, description: {} chars)",
            request.style(),
            framework,
            request.description().len()
        );

        let site_schema = SectionSchema::site();
        let schema: &SectionSchema = if framework.is_selected() {
            &FRAMEWORK_SITE_SCHEMA
        } else {
            &site_schema
        };

        self.drive("site", prompt, |extractor, raw| {
            let mut sections = extractor.extract_sections(raw, schema)?;
            let html = sections.take("html").unwrap_or_default();
            let mut css = sections.take("css").unwrap_or_default();
            let js = sections.take("js").unwrap_or_default();
            if css.is_empty() {
                css = FRAMEWORK_CSS_PLACEHOLDER.to_string();
            }
            Ok(SiteArtifact::new(html, css, js))
        })
        .await
    }

    /// Ask for a normalized file name for a page task
    pub async fn suggest_filename(&self, task: &str) -> Generation<String> {
        self.drive("filename", filename_prompt(task), |extractor, raw| {
            extractor.try_extract_single(raw, SingleMode::Filename)
        })
        .await
    }

    /// Ask for a single-file HTML page for a task
    pub async fn write_page(&self, task: &str, filename: &str) -> Generation<String> {
        self.drive("page", page_code_prompt(task, filename), |extractor, raw| {
            extractor.try_extract_single(raw, SingleMode::Code)
        })
        .await
    }

    /// Run the attempt state machine for one prompt
    async fn drive<T, F>(&self, what: &'static str, prompt: String, extract: F) -> Generation<T>
    where
        F: Fn(&ResponseExtractor, &str) -> Result<T, ExtractionFailure>,
    {
        debug!("Prompt length: {} chars", prompt.len());

        let mut state = AttemptState::Requested;
        let mut attempts: u8 = 0;

        loop {
            debug!("{} generation: {}", what, state.name());
            state = match state {
                AttemptState::Requested => AttemptState::AwaitingResponse,
                AttemptState::AwaitingResponse => {
                    attempts += 1;
                    match self.attempt(&prompt, &extract).await {
                        Ok(value) => AttemptState::Extracted(value),
                        Err(FailureReason::Extraction(failure)) if self.config.retry_on_failure => {
                            AttemptState::FailedOnce(failure)
                        }
                        Err(reason) => AttemptState::FailedFinal(reason),
                    }
                }
                AttemptState::FailedOnce(failure) => {
                    warn!("Invalid {} response format ({}). Retrying...", what, failure);
                    AttemptState::AwaitingRetryResponse
                }
                AttemptState::AwaitingRetryResponse => {
                    attempts += 1;
                    match self.attempt(&prompt, &extract).await {
                        Ok(value) => AttemptState::Extracted(value),
                        Err(reason) => AttemptState::FailedFinal(reason),
                    }
                }
                AttemptState::Extracted(value) => {
                    info!("{} generation succeeded after {} call(s)", what, attempts);
                    return Generation::Extracted { value, attempts };
                }
                AttemptState::FailedFinal(reason) => {
                    warn!("{} generation failed after {} call(s): {}", what, attempts, reason);
                    if let Some(raw) = reason.raw() {
                        debug!("Last raw response: {}", raw);
                    }
                    return Generation::FailedFinal { reason, attempts };
                }
            };
        }
    }

    /// One model call followed by extraction
    async fn attempt<T, F>(&self, prompt: &str, extract: &F) -> Result<T, FailureReason>
    where
        F: Fn(&ResponseExtractor, &str) -> Result<T, ExtractionFailure>,
    {
        let raw = timeout(self.config.generation_timeout(), self.call_llm(prompt))
            .await
            .map_err(|_| FailureReason::Timeout(self.config.generation_timeout()))??;

        debug!("LLM response length: {} chars", raw.len());
        extract(&self.extractor, &raw).map_err(FailureReason::Extraction)
    }

    /// Call the LLM provider
    async fn call_llm(&self, prompt: &str) -> Result<String, FailureReason> {
        let llm = Arc::clone(&self.llm_provider);
        let prompt = prompt.to_string();

        // Call in a blocking context since LlmProvider is not async
        tokio::task::spawn_blocking(move || {
            llm.generate(&prompt)
                .map_err(|e| FailureReason::Provider(e.to_string()))
        })
        .await
        .map_err(|e| FailureReason::Provider(format!("Task join error: {}", e)))?
    }
}
