//! Schema and result types for extraction

use crate::error::ExtractorError;
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Section names of a generated site, in schema order
pub const SITE_SECTIONS: [&str; 3] = ["html", "css", "js"];

static SITE_SCHEMA: LazyLock<SectionSchema> =
    LazyLock::new(|| SectionSchema::new(SITE_SECTIONS).expect("valid site schema"));

/// The set of named sections a response must contain
///
/// Names are case-insensitive tokens (`[A-Za-z0-9_]+`) and are stored
/// lower-cased. The schema owns the compiled delimiter pattern
/// (`---NAME---`) so repeated extractions do not recompile it.
#[derive(Debug, Clone)]
pub struct SectionSchema {
    names: Vec<String>,
    blank_allowed: HashSet<String>,
    delimiter: Regex,
}

impl SectionSchema {
    /// Build a schema from section names
    ///
    /// # Errors
    ///
    /// `ExtractorError::InvalidSchema` for an empty set, a name that is not a
    /// token, or a duplicate name (compared case-insensitively).
    pub fn new<I, S>(names: I) -> Result<Self, ExtractorError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut normalized: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref();
            if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
                return Err(ExtractorError::InvalidSchema(format!(
                    "section name '{}' must match [A-Za-z0-9_]+",
                    name
                )));
            }
            let lower = name.to_ascii_lowercase();
            if normalized.contains(&lower) {
                return Err(ExtractorError::InvalidSchema(format!(
                    "duplicate section name '{}'",
                    name
                )));
            }
            normalized.push(lower);
        }

        if normalized.is_empty() {
            return Err(ExtractorError::InvalidSchema(
                "at least one section is required".to_string(),
            ));
        }

        let alternatives: Vec<String> = normalized.iter().map(|n| regex::escape(n)).collect();
        let delimiter = Regex::new(&format!(
            r"(?i)---({})---[ \t]*(?:\r?\n)?",
            alternatives.join("|")
        ))?;

        Ok(Self {
            names: normalized,
            blank_allowed: HashSet::new(),
            delimiter,
        })
    }

    /// The `html`/`css`/`js` schema used for generated sites
    pub fn site() -> Self {
        SITE_SCHEMA.clone()
    }

    /// Let `name` be present with blank content
    ///
    /// The section must still have a delimiter; only the emptiness check is
    /// waived. Callers use this when they have their own substitute content.
    pub fn allow_blank(mut self, name: &str) -> Result<Self, ExtractorError> {
        let lower = name.to_ascii_lowercase();
        if !self.names.contains(&lower) {
            return Err(ExtractorError::InvalidSchema(format!(
                "cannot allow blank for unknown section '{}'",
                name
            )));
        }
        self.blank_allowed.insert(lower);
        Ok(self)
    }

    /// Section names in schema order
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether `name` is part of the schema
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Whether `name` may be blank
    pub fn is_blank_allowed(&self, name: &str) -> bool {
        self.blank_allowed.contains(&name.to_ascii_lowercase())
    }

    pub(crate) fn delimiter(&self) -> &Regex {
        &self.delimiter
    }
}

/// Successfully extracted sections, in schema order
///
/// Every schema section is present exactly once and its text is trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSections {
    sections: Vec<(String, String)>,
}

impl ExtractedSections {
    pub(crate) fn new(sections: Vec<(String, String)>) -> Self {
        Self { sections }
    }

    /// Text of a section (case-insensitive name)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.sections
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, text)| text.as_str())
    }

    /// Move a section's text out, leaving it absent
    pub fn take(&mut self, name: &str) -> Option<String> {
        let idx = self
            .sections
            .iter()
            .position(|(n, _)| n.eq_ignore_ascii_case(name))?;
        Some(self.sections.remove(idx).1)
    }

    /// Iterate `(name, text)` pairs in schema order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.sections.iter().map(|(n, t)| (n.as_str(), t.as_str()))
    }

    /// Number of sections
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether there are no sections
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

/// What `extract_single` should produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleMode {
    /// A normalized file name with the configured extension
    Filename,
    /// A block of code, returned verbatim
    Code,
}
