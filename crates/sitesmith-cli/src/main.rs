//! Sitesmith CLI - generate websites and pages with a local Ollama model.

use clap::Parser;
use sitesmith_cli::commands;
use sitesmith_cli::logging::init_logging;
use sitesmith_cli::repl;
use sitesmith_cli::{Cli, Command, Config, Formatter, SessionContext};
use tracing::warn;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> sitesmith_cli::Result<()> {
    let cli = Cli::parse();

    // An explicit path must exist; the default one is created on first run
    let mut save_error = None;
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => {
            let path = Config::path()?;
            if path.exists() {
                Config::from_file(&path)?
            } else {
                let cfg = Config::default();
                if let Err(e) = cfg.save_to(&path) {
                    save_error = Some((path, e));
                }
                cfg
            }
        }
    };

    let log_file = cli.log_file.clone().or_else(|| config.settings.log_file.clone());
    init_logging(log_file.as_deref())?;
    if let Some((path, e)) = save_error {
        warn!("Failed to write default config to {}: {}", path.display(), e);
    }

    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);
    let color_enabled = !cli.no_color && config.settings.color;
    let formatter = Formatter::new(format, color_enabled);

    let mut session = SessionContext::new();

    match cli.command {
        None | Some(Command::Repl) => {
            repl::run_repl(&config, &mut session, &formatter).await?;
        }
        Some(Command::Site(args)) => {
            commands::execute_site(args, &config, &mut session, &formatter).await?;
        }
        Some(Command::Page(args)) => {
            commands::execute_page(args, &config, &mut session, &formatter).await?;
        }
        Some(Command::Live(args)) => {
            commands::execute_live(args, &config, &formatter).await?;
        }
        Some(Command::Serve(args)) => {
            commands::execute_serve(args, &config, &mut session, &formatter).await?;
        }
        Some(Command::Pull(args)) => {
            commands::execute_pull(args, &config, &mut session, &formatter).await?;
        }
        Some(Command::Models) => {
            commands::execute_models(&config, &formatter).await?;
        }
    }

    // One-shot site and serve keep serving until interrupted
    if session.preview.is_some() {
        eprintln!("{}", formatter.info("Press Ctrl+C to stop the preview server"));
        tokio::signal::ctrl_c().await?;
        session.stop_preview().await;
    }

    Ok(())
}
