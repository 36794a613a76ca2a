//! Sitesmith Domain Layer
//!
//! Core vocabulary shared by every Sitesmith crate. It has no external
//! dependencies and defines what a generation request looks like, what the
//! generated artifacts are, and the trait boundary to the language model.
//!
//! ## Key Concepts
//!
//! - **GenerationRequest**: description + design style + optional CSS framework
//! - **SiteArtifact**: the three files of a generated static site
//! - **PageArtifact**: a single self-contained HTML page and its filename
//! - **LlmProvider**: the only way the rest of the system talks to a model
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Plain data and trait definitions only
//! - Infrastructure implementations live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod request;
pub mod traits;

// Re-exports for convenience
pub use artifact::{PageArtifact, SiteArtifact};
pub use request::{Framework, GenerationRequest, Style};
