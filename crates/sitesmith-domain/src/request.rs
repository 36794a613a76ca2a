//! Generation request and its enumerated options

use std::fmt;

/// Visual design style requested for a generated site
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Style {
    /// Gradients, rounded cards, soft shadows
    #[default]
    ModernGradient,

    /// Whitespace-heavy, muted palette
    Minimalistic,

    /// Saturated colors and large type
    BoldAndColorful,

    /// Serif fonts, traditional layout
    Classic,
}

impl Style {
    /// All styles in presentation order
    pub const ALL: [Style; 4] = [
        Style::ModernGradient,
        Style::Minimalistic,
        Style::BoldAndColorful,
        Style::Classic,
    ];

    /// Human-readable label, as used inside prompts
    pub fn label(&self) -> &'static str {
        match self {
            Style::ModernGradient => "Modern Gradient",
            Style::Minimalistic => "Minimalistic",
            Style::BoldAndColorful => "Bold and Colorful",
            Style::Classic => "Classic",
        }
    }

    /// Parse a style from a label or a kebab/snake-case key
    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "moderngradient" | "modern" | "gradient" => Some(Style::ModernGradient),
            "minimalistic" | "minimal" => Some(Style::Minimalistic),
            "boldandcolorful" | "bold" | "colorful" => Some(Style::BoldAndColorful),
            "classic" => Some(Style::Classic),
            _ => None,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Style {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid style: {}", s))
    }
}

/// CSS framework the generated site should pull from a CDN
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Framework {
    /// Plain CSS in a separate `styles.css`
    #[default]
    None,

    /// Tailwind CSS via the play CDN script
    TailwindCss,

    /// Bootstrap 5 via jsDelivr
    Bootstrap,
}

impl Framework {
    /// All frameworks in presentation order
    pub const ALL: [Framework; 3] = [Framework::None, Framework::TailwindCss, Framework::Bootstrap];

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Framework::None => "None",
            Framework::TailwindCss => "Tailwind CSS",
            Framework::Bootstrap => "Bootstrap",
        }
    }

    /// Whether a framework (anything but `None`) was selected
    pub fn is_selected(&self) -> bool {
        !matches!(self, Framework::None)
    }

    /// Parse a framework from a label or key
    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "none" | "plain" | "" => Some(Framework::None),
            "tailwindcss" | "tailwind" => Some(Framework::TailwindCss),
            "bootstrap" | "bootstrap5" => Some(Framework::Bootstrap),
            _ => None,
        }
    }
}

impl fmt::Display for Framework {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Framework {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid framework: {}", s))
    }
}

/// A request to generate a website
///
/// Immutable once built; prompt construction only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    description: String,
    style: Style,
    framework: Framework,
}

impl GenerationRequest {
    /// Create a new request
    pub fn new(description: impl Into<String>, style: Style, framework: Framework) -> Self {
        Self {
            description: description.into(),
            style,
            framework,
        }
    }

    /// Free-form description of the site
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Requested design style
    pub fn style(&self) -> Style {
        self.style
    }

    /// Requested CSS framework
    pub fn framework(&self) -> Framework {
        self.framework
    }
}

// Lower-case and drop separators so "Tailwind CSS", "tailwind-css" and
// "tailwind_css" all compare equal.
fn normalize_key(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}
