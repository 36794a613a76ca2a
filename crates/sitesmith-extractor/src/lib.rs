//! Sitesmith Extractor
//!
//! Turns free-form LLM responses into validated site artifacts.
//!
//! # Overview
//!
//! Model output is noisy: reasoning blocks, prose, markdown fences and
//! half-followed delimiter conventions. The extractor reduces a raw response
//! to either a set of named sections (`---HTML---`, `---CSS---`, `---JS---`)
//! or a single value (a file name or a block of code). Malformed output is an
//! expected outcome and comes back as an [`ExtractionFailure`] value.
//!
//! # Architecture
//!
//! ```text
//! GenerationRequest → PromptBuilder → LLM → ResponseExtractor → SiteArtifact
//!                                      ↑            │
//!                                      └── retry ───┘ (at most one)
//! ```
//!
//! [`SiteGenerator`] owns the retry budget: two model calls per logical
//! generation, after which the caller falls back to a built-in default
//! from [`templates`].
//!
//! # Example Usage
//!
//! ```no_run
//! use sitesmith_domain::{Framework, GenerationRequest, Style};
//! use sitesmith_extractor::{templates, ExtractorConfig, SiteGenerator};
//! use sitesmith_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new("---HTML---\n<h1>Hi</h1>\n---CSS---\nh1{}\n---JS---\n;\n");
//! let generator = SiteGenerator::new(llm, ExtractorConfig::default())?;
//!
//! let request = GenerationRequest::new("A bakery", Style::Minimalistic, Framework::None);
//! let site = generator
//!     .generate_site(&request)
//!     .await
//!     .or_fallback(templates::default_website);
//!
//! if let Some(reason) = &site.fallback_reason {
//!     eprintln!("Using default website: {}", reason);
//! }
//! println!("{}", site.value.html);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod generator;
mod parser;
mod prompt;
mod types;

pub mod templates;


pub use config::ExtractorConfig;
pub use error::{ExtractionFailure, ExtractorError, FailureKind, FailureReason};
pub use generator::{AttemptState, Generation, Resolved, SiteGenerator, MAX_MODEL_CALLS};
pub use parser::ResponseExtractor;
pub use prompt::{filename_prompt, page_code_prompt, PromptBuilder};
pub use templates::ExampleKind;
pub use types::{ExtractedSections, SectionSchema, SingleMode, SITE_SECTIONS};
