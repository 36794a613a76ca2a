//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use crate::session::PromptHistory;
use colored::*;
use sitesmith_domain::{PageArtifact, SiteArtifact};
use sitesmith_llm::ModelInfo;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Selected output format.
    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Format installed models.
    pub fn format_models(&self, models: &[ModelInfo]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(models)?),
            OutputFormat::Table => Ok(self.format_models_table(models)),
            OutputFormat::Quiet => Ok(models
                .iter()
                .map(|m| m.name.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    fn format_models_table(&self, models: &[ModelInfo]) -> String {
        if models.is_empty() {
            return self.colorize("No models installed.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Name", "Size", "Modified"]);

        for model in models {
            let modified = model.modified_at.get(..19).unwrap_or(&model.modified_at);
            builder.push_record([
                model.name.clone(),
                format_size(model.size),
                modified.to_string(),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format the prompt history, most recent first.
    pub fn format_history(&self, history: &PromptHistory) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let prompts: Vec<&str> = history.iter().collect();
                Ok(serde_json::to_string_pretty(&prompts)?)
            }
            OutputFormat::Quiet => Ok(history.iter().collect::<Vec<_>>().join("\n")),
            OutputFormat::Table => {
                if history.is_empty() {
                    return Ok(self.colorize("No prompts yet.", "yellow"));
                }

                let mut builder = Builder::default();
                builder.push_record(["#", "Prompt"]);
                for (idx, prompt) in history.iter().enumerate() {
                    builder.push_record([(idx + 1).to_string(), prompt.to_string()]);
                }

                let mut table = builder.build();
                table
                    .with(Style::rounded())
                    .with(Modify::new(Rows::first()).with(Alignment::center()));
                Ok(table.to_string())
            }
        }
    }

    /// Format the generated site code.
    pub fn format_site(&self, site: &SiteArtifact) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let files: serde_json::Map<String, serde_json::Value> = site
                    .files()
                    .iter()
                    .map(|(name, content)| (name.to_string(), serde_json::json!(content)))
                    .collect();
                Ok(serde_json::to_string_pretty(&files)?)
            }
            OutputFormat::Quiet => Ok(String::new()),
            OutputFormat::Table => Ok(site
                .files()
                .iter()
                .map(|(name, content)| self.code_block(name, content))
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format a generated page.
    pub fn format_page(&self, page: &PageArtifact) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&serde_json::json!({
                "filename": page.filename,
                "code": page.code,
            }))?),
            OutputFormat::Quiet => Ok(page.filename.clone()),
            OutputFormat::Table => Ok(self.code_block(&page.filename, &page.code)),
        }
    }

    fn code_block(&self, title: &str, code: &str) -> String {
        let rule = "─".repeat(60);
        format!(
            "{}\n{}\n{}\n",
            self.colorize(&format!("── {} ", title), "cyan"),
            code,
            self.colorize(&rule, "cyan")
        )
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Format the preview URL line.
    pub fn preview_url(&self, url: &str) -> String {
        self.success(&format!("Preview your website at: {}", url))
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Human-readable byte size.
pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut size = bytes as f64;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_model() -> ModelInfo {
        ModelInfo {
            name: "llama3.2:latest".to_string(),
            model: "llama3.2:latest".to_string(),
            size: 2_019_393_189,
            modified_at: "2025-01-10T12:00:00.000000+01:00".to_string(),
        }
    }

    fn create_test_site() -> SiteArtifact {
        SiteArtifact::new("<h1>Hi</h1>", "h1 {}", "console.log(1)")
    }

    #[test]
    fn test_models_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_models(&[create_test_model()]).unwrap();
        assert!(output.contains("\"name\": \"llama3.2:latest\""));
    }

    #[test]
    fn test_models_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_models(&[create_test_model()]).unwrap();
        assert_eq!(output, "llama3.2:latest");
    }

    #[test]
    fn test_models_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_models(&[create_test_model()]).unwrap();
        assert!(output.contains("Name"));
        assert!(output.contains("1.9 GB"));
        assert!(output.contains("2025-01-10T12:00:00"));
    }

    #[test]
    fn test_empty_models() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_models(&[]).unwrap();
        assert!(output.contains("No models installed"));
    }

    #[test]
    fn test_site_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_site(&create_test_site()).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["index.html"], "<h1>Hi</h1>");
        assert_eq!(parsed["styles.css"], "h1 {}");
        assert_eq!(parsed["script.js"], "console.log(1)");
    }

    #[test]
    fn test_site_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_site(&create_test_site()).unwrap();
        assert!(output.contains("── index.html"));
        assert!(output.contains("── script.js"));
        assert!(output.contains("console.log(1)"));
    }

    #[test]
    fn test_history_format() {
        let mut history = PromptHistory::new(10);
        history.record("first");
        history.record("second");

        let formatter = Formatter::new(OutputFormat::Quiet, false);
        assert_eq!(formatter.format_history(&history).unwrap(), "second\nfirst");

        let formatter = Formatter::new(OutputFormat::Table, false);
        assert!(formatter.format_history(&history).unwrap().contains("Prompt"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let msg = formatter.success("test");
        assert_eq!(msg, "✓ test");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024), "5.0 MB");
    }
}
