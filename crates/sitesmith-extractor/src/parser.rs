//! Parse raw model output into validated artifacts

use crate::config::ExtractorConfig;
use crate::error::{ExtractionFailure, ExtractorError, FailureKind};
use crate::types::{ExtractedSections, SectionSchema, SingleMode};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;
use tracing::debug;

/// First fenced block: "```" plus optional info string, body, closing "```"
static FENCED_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```[^\n]*\n([\s\S]*?)\n[ \t]*```").expect("valid regex"));

static DEFAULT_EXTRACTOR: LazyLock<ResponseExtractor> = LazyLock::new(|| {
    ResponseExtractor::new(&ExtractorConfig::default()).expect("valid default extractor")
});

/// Turns untrusted model text into validated artifacts
///
/// Immutable after construction: every method takes `&self`, performs no
/// I/O and never panics on malformed input, so one instance can be shared
/// across threads.
#[derive(Debug, Clone)]
pub struct ResponseExtractor {
    reasoning: Regex,
    extension: String,
}

impl ResponseExtractor {
    /// Build an extractor from configuration
    pub fn new(config: &ExtractorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;

        let open = regex::escape(&config.reasoning_open_tag);
        let close = regex::escape(&config.reasoning_close_tag);
        let reasoning = Regex::new(&format!(r"(?s){open}.*?{close}|{open}|{close}"))?;

        Ok(Self {
            reasoning,
            extension: config.filename_extension.clone(),
        })
    }

    /// Extension appended in filename mode
    pub fn filename_extension(&self) -> &str {
        &self.extension
    }

    /// Remove reasoning blocks and stray reasoning tags, then trim
    ///
    /// Removal repeats until nothing matches, so a tag spliced together by a
    /// previous removal is also dropped and the operation is idempotent.
    pub fn strip_reasoning(&self, raw: &str) -> String {
        let mut text = raw.to_string();
        loop {
            let next = self.reasoning.replace_all(&text, "");
            if next == text {
                break;
            }
            text = next.into_owned();
        }
        text.trim().to_string()
    }

    /// Split `raw` on `---NAME---` delimiters and validate against `schema`
    ///
    /// Text before the first delimiter is ignored. Section order in the input
    /// does not matter; a repeated section keeps its last occurrence.
    pub fn extract_sections(
        &self,
        raw: &str,
        schema: &SectionSchema,
    ) -> Result<ExtractedSections, ExtractionFailure> {
        let cleaned = self.strip_reasoning(raw);

        let markers: Vec<(usize, usize, String)> = schema
            .delimiter()
            .captures_iter(&cleaned)
            .filter_map(|caps| {
                let whole = caps.get(0)?;
                let name = caps.get(1)?.as_str().to_ascii_lowercase();
                Some((whole.start(), whole.end(), name))
            })
            .collect();

        if markers.is_empty() {
            debug!("No section delimiters in {} chars of output", cleaned.len());
            return Err(ExtractionFailure::new(FailureKind::NoDelimitersFound, raw));
        }

        let mut found: HashMap<String, String> = HashMap::new();
        for (idx, (_, body_start, name)) in markers.iter().enumerate() {
            let body_end = markers
                .get(idx + 1)
                .map(|(next_start, _, _)| *next_start)
                .unwrap_or(cleaned.len());
            found.insert(name.clone(), cleaned[*body_start..body_end].trim().to_string());
        }

        let missing: Vec<String> = schema
            .names()
            .iter()
            .filter(|name| !found.contains_key(*name))
            .cloned()
            .collect();
        if !missing.is_empty() {
            debug!("Missing sections: {}", missing.join(", "));
            return Err(ExtractionFailure::new(
                FailureKind::MissingSections(missing),
                raw,
            ));
        }

        if let Some(empty) = schema.names().iter().find(|name| {
            found.get(*name).is_some_and(|text| text.is_empty()) && !schema.is_blank_allowed(name)
        }) {
            debug!("Empty section: {}", empty);
            return Err(ExtractionFailure::new(
                FailureKind::EmptySection(empty.clone()),
                raw,
            ));
        }

        let sections = schema
            .names()
            .iter()
            .map(|name| (name.clone(), found.remove(name).unwrap_or_default()))
            .collect();

        Ok(ExtractedSections::new(sections))
    }

    /// Pull a single value out of `raw`
    ///
    /// The candidate is the body of the first fenced block, or the whole text
    /// when there is none. Reasoning blocks are removed first.
    pub fn extract_single(&self, raw: &str, mode: SingleMode) -> Option<String> {
        let cleaned = self.strip_reasoning(raw);
        let candidate = FENCED_BLOCK
            .captures(&cleaned)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .unwrap_or(cleaned.as_str());

        match mode {
            SingleMode::Filename => self.normalize_filename(candidate),
            SingleMode::Code => {
                if candidate.trim().is_empty() {
                    None
                } else {
                    Some(candidate.to_string())
                }
            }
        }
    }

    /// Like [`extract_single`](Self::extract_single) but reports `NoValidCandidate`
    pub fn try_extract_single(
        &self,
        raw: &str,
        mode: SingleMode,
    ) -> Result<String, ExtractionFailure> {
        self.extract_single(raw, mode)
            .ok_or_else(|| ExtractionFailure::new(FailureKind::NoValidCandidate, raw))
    }

    /// Reduce a candidate to `[a-z0-9_-]+` and append the extension
    ///
    /// Every other character, dots included, becomes `_`, so `index.html`
    /// turns into `index_html.html`.
    pub fn normalize_filename(&self, candidate: &str) -> Option<String> {
        let stem = candidate.trim();

        let mut normalized = String::with_capacity(stem.len());
        for c in stem.chars().flat_map(char::to_lowercase) {
            let c = if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
                c
            } else {
                '_'
            };
            if c == '_' && normalized.ends_with('_') {
                continue;
            }
            normalized.push(c);
        }

        let normalized = normalized.trim_matches('_');
        if normalized.is_empty() {
            None
        } else {
            Some(format!("{}.{}", normalized, self.extension))
        }
    }
}

impl Default for ResponseExtractor {
    fn default() -> Self {
        DEFAULT_EXTRACTOR.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> ResponseExtractor {
        ResponseExtractor::default()
    }

    #[test]
    fn test_extract_all_sections() {
        let raw = "---HTML---\n<p>hi</p>\n---CSS---\nbody{}\n---JS---\nconsole.log(1)\n";
        let sections = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap();

        assert_eq!(sections.len(), 3);
        assert_eq!(sections.get("html"), Some("<p>hi</p>"));
        assert_eq!(sections.get("css"), Some("body{}"));
        assert_eq!(sections.get("js"), Some("console.log(1)"));
    }

    #[test]
    fn test_missing_js_section() {
        let raw = "---HTML---\n<p>hi</p>\n---CSS---\nbody{}\n";
        let failure = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap_err();

        assert_eq!(failure.kind, FailureKind::MissingSections(vec!["js".to_string()]));
        assert_eq!(failure.raw, raw);
    }

    #[test]
    fn test_no_delimiters() {
        let raw = "Sure! Here is your website:\n<html></html>";
        let failure = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoDelimitersFound);
    }

    #[test]
    fn test_empty_section() {
        let raw = "---HTML---\n<p>hi</p>\n---CSS---\n   \n---JS---\nconsole.log(1)";
        let failure = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::EmptySection("css".to_string()));
    }

    #[test]
    fn test_blank_allowed_section() {
        let raw = "---HTML---\n<p>hi</p>\n---CSS---\n---JS---\nconsole.log(1)";
        let schema = SectionSchema::site().allow_blank("css").unwrap();
        let sections = extractor().extract_sections(raw, &schema).unwrap();
        assert_eq!(sections.get("css"), Some(""));
    }

    #[test]
    fn test_missing_reported_before_empty() {
        let raw = "---HTML---\n\n---CSS---\nbody{}";
        let failure = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::MissingSections(vec!["js".to_string()]));
    }

    #[test]
    fn test_case_insensitive_delimiters_and_preamble() {
        let raw = "Here you go:\n---html---\n<p></p>\n---Css---  \np{}\n---js---\nlet x;";
        let sections = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap();
        assert_eq!(sections.get("html"), Some("<p></p>"));
        assert_eq!(sections.get("css"), Some("p{}"));
        assert_eq!(sections.get("js"), Some("let x;"));
    }

    #[test]
    fn test_repeated_section_keeps_last() {
        let raw = "---HTML---\nfirst\n---CSS---\na{}\n---JS---\nx\n---HTML---\nsecond";
        let sections = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap();
        assert_eq!(sections.get("html"), Some("second"));
        assert_eq!(sections.get("js"), Some("x"));
    }

    #[test]
    fn test_unknown_delimiters_stay_in_content() {
        let raw = "---HTML---\n<p></p>\n---MD---\n# hi\n---CSS---\np{}\n---JS---\nx";
        let sections = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap();
        assert_eq!(sections.get("html"), Some("<p></p>\n---MD---\n# hi"));
        assert_eq!(sections.len(), 3);
    }

    #[test]
    fn test_reasoning_block_removed() {
        let raw = "<think>\nI should use ---HTML--- markers\n</think>\n---HTML---\n<p></p>\n---CSS---\np{}\n---JS---\nx";
        let sections = extractor()
            .extract_sections(raw, &SectionSchema::site())
            .unwrap();
        assert_eq!(sections.get("html"), Some("<p></p>"));
    }

    #[test]
    fn test_strip_reasoning_stray_tags() {
        let e = extractor();
        assert_eq!(e.strip_reasoning("  <think>half open"), "half open");
        assert_eq!(e.strip_reasoning("done</think> answer "), "done answer");
        assert_eq!(e.strip_reasoning("a<think>x</think>b<think>y</think>c"), "abc");
    }

    #[test]
    fn test_strip_reasoning_spliced_tag() {
        let e = extractor();
        let once = e.strip_reasoning("<thi<think></think>nk>hidden</think>shown");
        assert_eq!(once, "hiddenshown");
        assert_eq!(e.strip_reasoning(&once), once);
    }

    #[test]
    fn test_custom_reasoning_tags() {
        let config = ExtractorConfig {
            reasoning_open_tag: "[[reason]]".to_string(),
            reasoning_close_tag: "[[/reason]]".to_string(),
            ..ExtractorConfig::default()
        };
        let e = ResponseExtractor::new(&config).unwrap();
        assert_eq!(e.strip_reasoning("[[reason]]a.b*c[[/reason]]ok"), "ok");
        assert_eq!(e.strip_reasoning("<think>kept</think>"), "<think>kept</think>");
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractorConfig {
            filename_extension: "HTML".to_string(),
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            ResponseExtractor::new(&config),
            Err(ExtractorError::Config(_))
        ));
    }

    #[test]
    fn test_filename_normalization() {
        let e = extractor();
        assert_eq!(
            e.extract_single("My Chat Bot!!", SingleMode::Filename),
            Some("my_chat_bot.html".to_string())
        );
        assert_eq!(e.extract_single("###", SingleMode::Filename), None);
        assert_eq!(
            e.extract_single("todo-list__app", SingleMode::Filename),
            Some("todo-list_app.html".to_string())
        );
    }

    #[test]
    fn test_filename_from_fenced_block() {
        let raw = "Sure, here is a name:\n```\nWeather Dashboard.HTML\n```\nEnjoy!";
        assert_eq!(
            extractor().extract_single(raw, SingleMode::Filename),
            Some("weather_dashboard_html.html".to_string())
        );
    }

    #[test]
    fn test_filename_dots_become_underscores() {
        let e = extractor();
        assert_eq!(
            e.extract_single("index.html", SingleMode::Filename),
            Some("index_html.html".to_string())
        );
        assert_eq!(
            e.extract_single("My Page.HTML", SingleMode::Filename),
            Some("my_page_html.html".to_string())
        );
        assert_eq!(
            e.extract_single("`index.html`", SingleMode::Filename),
            Some("index_html.html".to_string())
        );
        assert_eq!(
            e.extract_single("v1.2 page", SingleMode::Filename),
            Some("v1_2_page.html".to_string())
        );
        assert_eq!(e.extract_single(".html", SingleMode::Filename), Some("html.html".to_string()));
    }

    #[test]
    fn test_filename_with_custom_extension() {
        let config = ExtractorConfig {
            filename_extension: "htm".to_string(),
            ..ExtractorConfig::default()
        };
        let e = ResponseExtractor::new(&config).unwrap();
        assert_eq!(
            e.extract_single("My Chat Bot!!", SingleMode::Filename),
            Some("my_chat_bot.htm".to_string())
        );
    }

    #[test]
    fn test_filename_after_reasoning() {
        let raw = "<think>The user wants a timer</think>\n```\ncountdown_timer\n```";
        assert_eq!(
            extractor().extract_single(raw, SingleMode::Filename),
            Some("countdown_timer.html".to_string())
        );
    }

    #[test]
    fn test_code_from_fenced_block_with_language() {
        let raw = "Here:\n```html\n<!DOCTYPE html>\n<html></html>\n```\nDone.";
        assert_eq!(
            extractor().extract_single(raw, SingleMode::Code),
            Some("<!DOCTYPE html>\n<html></html>".to_string())
        );
    }

    #[test]
    fn test_code_without_fence_uses_whole_text() {
        assert_eq!(
            extractor().extract_single("  <p>plain</p>  ", SingleMode::Code),
            Some("<p>plain</p>".to_string())
        );
        assert_eq!(extractor().extract_single(" \n ", SingleMode::Code), None);
    }

    #[test]
    fn test_only_first_fence_used() {
        let raw = "```\nfirst\n```\n```\nsecond\n```";
        assert_eq!(
            extractor().extract_single(raw, SingleMode::Code),
            Some("first".to_string())
        );
    }

    #[test]
    fn test_try_extract_single_reports_failure() {
        let failure = extractor()
            .try_extract_single("!!!", SingleMode::Filename)
            .unwrap_err();
        assert_eq!(failure.kind, FailureKind::NoValidCandidate);
        assert_eq!(failure.raw, "!!!");
    }
}
