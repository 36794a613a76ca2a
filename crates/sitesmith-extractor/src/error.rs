//! Error and failure types for the Extractor
//!
//! Two families live here. `ExtractorError` is a fault: bad configuration or a
//! malformed schema, i.e. a programming error on the caller's side.
//! `ExtractionFailure` is an expected outcome for malformed model output and
//! is returned as a value, never raised.

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Fault-level errors (caller or configuration mistakes)
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Section schema is empty, has duplicates or has a non-token name
    #[error("Invalid section schema: {0}")]
    InvalidSchema(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// A pattern built from configuration failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// What went wrong while extracting from model output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// None of the schema's delimiters occur in the text
    NoDelimitersFound,

    /// These schema sections have no delimiter block (schema order)
    MissingSections(Vec<String>),

    /// This section is present but blank after trimming
    EmptySection(String),

    /// Single-value mode found nothing usable
    NoValidCandidate,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::NoDelimitersFound => write!(f, "no section delimiters found"),
            FailureKind::MissingSections(names) => {
                write!(f, "missing sections: {}", names.join(", "))
            }
            FailureKind::EmptySection(name) => write!(f, "empty section: {}", name),
            FailureKind::NoValidCandidate => write!(f, "no valid candidate"),
        }
    }
}

/// A failed extraction, carrying the raw text for diagnostic logging
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{kind}")]
pub struct ExtractionFailure {
    /// Failure classification
    pub kind: FailureKind,

    /// Unmodified model output
    pub raw: String,
}

impl ExtractionFailure {
    /// Create a failure of the given kind for this raw text
    pub fn new(kind: FailureKind, raw: impl Into<String>) -> Self {
        Self {
            kind,
            raw: raw.into(),
        }
    }
}

/// Why a generation ended in its terminal failed state
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FailureReason {
    /// Every permitted response failed extraction; holds the last failure
    #[error("Model response failure: {0}")]
    Extraction(ExtractionFailure),

    /// The provider call itself failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// The provider did not answer in time
    #[error("Generation timed out after {0:?}")]
    Timeout(Duration),
}

impl FailureReason {
    /// Raw model output behind the failure, if there was any
    pub fn raw(&self) -> Option<&str> {
        match self {
            FailureReason::Extraction(failure) => Some(&failure.raw),
            _ => None,
        }
    }
}
