//! LLM prompt engineering for site and page generation

use crate::templates::ExampleKind;
use sitesmith_domain::{Framework, GenerationRequest};

/// Builds the multi-file website prompt
pub struct PromptBuilder<'a> {
    request: &'a GenerationRequest,
    example: ExampleKind,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder; the example is picked from the description
    pub fn new(request: &'a GenerationRequest) -> Self {
        Self {
            request,
            example: ExampleKind::for_description(request.description()),
        }
    }

    /// Override the inspiration example
    pub fn with_example(mut self, example: ExampleKind) -> Self {
        self.example = example;
        self
    }

    /// Build the complete website prompt
    pub fn build(&self) -> String {
        let mut prompt = String::new();

        // 1. Role and file layout
        prompt.push_str(SITE_INSTRUCTIONS);
        prompt.push('\n');

        // 2. Framework-specific styling rules
        if let Some(instruction) = framework_instruction(self.request.framework()) {
            prompt.push_str(instruction);
            prompt.push('\n');
        }

        // 3. Delimiter contract
        prompt.push_str(DELIMITER_FORMAT);
        prompt.push('\n');

        // 4. Style and uniqueness
        prompt.push_str(&format!(
            "Ensure the code is functional, error-free, and visually appealing. The design should reflect the specified style ({}) and be unique, avoiding similarity to the example or default portfolio unless the prompt explicitly requests it.\n",
            self.request.style()
        ));
        prompt.push_str(DESIGN_HINTS);
        prompt.push('\n');

        // 5. Inspiration example in the same delimiter format
        let example = self.example.site();
        prompt.push_str("Example (use as inspiration, not a template):\n");
        prompt.push_str(&format!(
            "---HTML---\n{}\n---CSS---\n{}\n---JS---\n{}\n",
            example.html, example.css, example.js
        ));

        // 6. The description itself
        prompt.push_str(&format!("Description: {}\n", self.request.description()));

        prompt
    }
}

/// Prompt asking for a file name for a page task
pub fn filename_prompt(task: &str) -> String {
    format!(
        "Suggest an HTML filename for the task \"{}\" (e.g., \"index.html\"). Return only the filename inside triple backticks, no extra text:\n```\nfilename\n```",
        task
    )
}

/// Prompt asking for a single self-contained HTML page
pub fn page_code_prompt(task: &str, filename: &str) -> String {
    format!(
        "Write HTML code for the task \"{task}\" to be saved in {filename}. Include inline CSS in <style> tags and JavaScript in <script> tags within the HTML. Return only the code inside triple backticks, no extra text. Example:\n```\n{PAGE_EXAMPLE}\n```\nFor task \"{task}\":\n```\ncode\n```\n"
    )
}

fn framework_instruction(framework: Framework) -> Option<&'static str> {
    match framework {
        Framework::None => None,
        Framework::TailwindCss => Some(TAILWIND_INSTRUCTION),
        Framework::Bootstrap => Some(BOOTSTRAP_INSTRUCTION),
    }
}

const SITE_INSTRUCTIONS: &str = r#"You are an expert web developer. Based on the following description, generate a complete website with:
- An HTML file (index.html) with semantic structure, linking to external styles.css and script.js (unless using a CSS framework).
- A CSS file (styles.css) for styling, using modern design principles (e.g., flexbox, responsive design), unless a framework is specified.
- A JavaScript file (script.js) for interactivity (e.g., event listeners, animations)."#;

const TAILWIND_INSTRUCTION: &str = r#"Use Tailwind CSS via CDN (<script src="https://cdn.tailwindcss.com"></script>) for styling instead of a separate styles.css file. Include Tailwind classes in the HTML and minimize custom CSS."#;

const BOOTSTRAP_INSTRUCTION: &str = r#"Use Bootstrap 5 via CDN (<link href="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/css/bootstrap.min.css" rel="stylesheet"> and <script src="https://cdn.jsdelivr.net/npm/bootstrap@5.3.0/dist/js/bootstrap.bundle.min.js"></script>) for styling and interactivity. Use Bootstrap classes in the HTML and minimize custom CSS and JS."#;

const DELIMITER_FORMAT: &str = r#"Return the raw code for each file, separated by delimiters as follows:
---HTML---
<!DOCTYPE html><html lang="en">...</html>
---CSS---
body { font-family: Arial; ... }
---JS---
console.log('Hello');
Do not include markdown, code fences, explanations, or tags like <think>. Use only the delimiters above to separate the code sections."#;

const DESIGN_HINTS: &str = "For example, a chatbot UI should have a message input and chat history with a modern layout, while a blog should have articles and comments with a distinct aesthetic.";

const PAGE_EXAMPLE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Sample Page</title>
    <style>
        body { font-family: Arial, sans-serif; text-align: center; }
        h1 { color: blue; }
    </style>
</head>
<body>
    <h1>Hello, World!</h1>
    <script>
        console.log("Page loaded!");
    </script>
</body>
</html>"#;

#[cfg(test)]
mod tests {
    use super::*;
    use sitesmith_domain::Style;

    fn request(description: &str, framework: Framework) -> GenerationRequest {
        GenerationRequest::new(description, Style::BoldAndColorful, framework)
    }

    #[test]
    fn test_prompt_includes_instructions() {
        let req = request("A bakery landing page", Framework::None);
        let prompt = PromptBuilder::new(&req).build();

        assert!(prompt.contains("You are an expert web developer"));
        assert!(prompt.contains("---HTML---"));
        assert!(prompt.contains("---CSS---"));
        assert!(prompt.contains("---JS---"));
        assert!(prompt.contains("(Bold and Colorful)"));
        assert!(prompt.ends_with("Description: A bakery landing page\n"));
    }

    #[test]
    fn test_no_framework_instruction_without_framework() {
        let req = request("A bakery landing page", Framework::None);
        let prompt = PromptBuilder::new(&req).build();
        assert!(!prompt.contains("cdn.tailwindcss.com"));
        assert!(!prompt.contains("bootstrap.min.css"));
    }

    #[test]
    fn test_framework_instructions() {
        let req = request("A dashboard", Framework::TailwindCss);
        assert!(PromptBuilder::new(&req).build().contains("cdn.tailwindcss.com"));

        let req = request("A dashboard", Framework::Bootstrap);
        assert!(PromptBuilder::new(&req).build().contains("bootstrap@5.3.0"));
    }

    #[test]
    fn test_example_follows_description() {
        let req = request("A chatbot for a pizza place", Framework::None);
        assert!(PromptBuilder::new(&req).build().contains("chat-container"));

        let req = request("My travel blog", Framework::None);
        assert!(PromptBuilder::new(&req).build().contains("My Blog"));

        let req = request("My travel blog", Framework::None);
        let prompt = PromptBuilder::new(&req)
            .with_example(ExampleKind::Portfolio)
            .build();
        assert!(prompt.contains("This is my portfolio."));
        assert!(!prompt.contains("My Blog"));
    }

    #[test]
    fn test_filename_prompt() {
        let prompt = filename_prompt("todo list");
        assert!(prompt.contains("\"todo list\""));
        assert!(prompt.contains("```\nfilename\n```"));
    }

    #[test]
    fn test_page_code_prompt() {
        let prompt = page_code_prompt("stopwatch", "stopwatch.html");
        assert!(prompt.contains("to be saved in stopwatch.html"));
        assert!(prompt.contains("For task \"stopwatch\":"));
        assert!(prompt.contains("<title>Sample Page</title>"));
    }
}
