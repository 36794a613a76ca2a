//! Sitesmith CLI library.
//!
//! Command-line and REPL front end for generating websites and single pages
//! with a local Ollama model: configuration, session state, artifact writing,
//! workspace and editor integration, and output formatting.

pub mod artifacts;
pub mod browser;
pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod output;
pub mod repl;
pub mod session;
pub mod workspace;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
pub use session::SessionContext;
