//! Generated artifacts handed to the writing collaborators

/// File names of a generated site, in write order
pub const SITE_FILES: [&str; 3] = ["index.html", "styles.css", "script.js"];

/// The three files of a generated static site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteArtifact {
    /// Content of `index.html`
    pub html: String,

    /// Content of `styles.css`
    pub css: String,

    /// Content of `script.js`
    pub js: String,
}

impl SiteArtifact {
    /// Create a site artifact from its three parts
    pub fn new(html: impl Into<String>, css: impl Into<String>, js: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            css: css.into(),
            js: js.into(),
        }
    }

    /// Pair each file name with its content
    pub fn files(&self) -> [(&'static str, &str); 3] {
        [
            (SITE_FILES[0], self.html.as_str()),
            (SITE_FILES[1], self.css.as_str()),
            (SITE_FILES[2], self.js.as_str()),
        ]
    }
}

/// A single self-contained HTML page (inline CSS and JS)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageArtifact {
    /// Normalized file name, e.g. `todo_list.html`
    pub filename: String,

    /// Full HTML document
    pub code: String,
}
