//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use sitesmith_domain::{Framework, Style};
use std::path::PathBuf;

/// Sitesmith - Generate websites and pages with a local Ollama model.
#[derive(Debug, Parser)]
#[command(name = "sitesmith")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true, env = "SITESMITH_CONFIG")]
    pub config: Option<PathBuf>,

    /// Write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Quiet format (paths and names only)
    Quiet,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate index.html, styles.css and script.js and preview them
    Site(SiteArgs),

    /// Generate a single HTML page in the workspace and open it in VS Code
    Page(PageArgs),

    /// Start the VS Code Live Server task for the workspace
    Live(LiveArgs),

    /// Preview an existing output directory
    Serve(ServeArgs),

    /// Pull the model with `ollama pull`
    Pull(PullArgs),

    /// List installed models
    Models,

    /// Enter interactive REPL mode
    Repl,
}

/// Arguments for the site command.
#[derive(Debug, Clone, Default, Parser)]
pub struct SiteArgs {
    /// Website description
    pub description: Vec<String>,

    /// Design style
    #[arg(short, long, default_value_t = Style::default())]
    pub style: Style,

    /// CSS framework
    #[arg(long, default_value_t = Framework::default())]
    pub framework: Framework,

    /// Output directory (defaults to preview.root_dir)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Model to use instead of ollama.site_model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Write files without starting the preview server
    #[arg(long)]
    pub no_preview: bool,

    /// Do not open a browser
    #[arg(long)]
    pub no_browser: bool,
}

/// Arguments for the page command.
#[derive(Debug, Clone, Default, Parser)]
pub struct PageArgs {
    /// Task description
    #[arg(required = true)]
    pub task: Vec<String>,

    /// Workspace directory (defaults to workspace.dir)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,

    /// Model to use instead of ollama.page_model
    #[arg(short, long)]
    pub model: Option<String>,

    /// Do not open VS Code
    #[arg(long)]
    pub no_editor: bool,
}

/// Arguments for the live command.
#[derive(Debug, Clone, Default, Parser)]
pub struct LiveArgs {
    /// Workspace directory (defaults to workspace.dir)
    #[arg(short, long)]
    pub workspace: Option<PathBuf>,
}

/// Arguments for the serve command.
#[derive(Debug, Clone, Default, Parser)]
pub struct ServeArgs {
    /// Directory to serve (defaults to preview.root_dir)
    pub dir: Option<PathBuf>,

    /// First port to try
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Do not open a browser
    #[arg(long)]
    pub no_browser: bool,
}

/// Arguments for the pull command.
#[derive(Debug, Clone, Default, Parser)]
pub struct PullArgs {
    /// Model to pull (defaults to ollama.site_model)
    pub model: Option<String>,
}

impl SiteArgs {
    /// Description text, or `None` when no words were given
    pub fn description_text(&self) -> Option<String> {
        let text = self.description.join(" ");
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl PageArgs {
    /// Task text
    pub fn task_text(&self) -> String {
        self.task.join(" ").trim().to_string()
    }
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Quiet => crate::config::OutputFormat::Quiet,
        }
    }
}
