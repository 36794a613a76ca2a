//! Page command implementation.

use super::pull::ensure_model;
use crate::cli::PageArgs;
use crate::config::Config;
use crate::editor::{VsCode, INSTALL_HINT};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::SessionContext;
use crate::workspace::{CreateOutcome, GitInit, Workspace};
use sitesmith_domain::PageArtifact;
use sitesmith_extractor::templates::{fallback_filename, FALLBACK_PAGE};
use sitesmith_extractor::SiteGenerator;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// Execute the page command.
pub async fn execute_page(
    args: PageArgs,
    config: &Config,
    session: &mut SessionContext,
    formatter: &Formatter,
) -> Result<()> {
    let task = args.task_text();
    if task.is_empty() {
        return Err(CliError::InvalidInput("Task description is required".into()));
    }
    session.record_task(&task);

    let workspace =
        Workspace::open(args.workspace.unwrap_or_else(|| config.workspace.dir.clone()))?;
    match workspace.init_git().await? {
        GitInit::Initialized => eprintln!(
            "{}",
            formatter.info(&format!(
                "Initialized git repository in {}",
                workspace.root().display()
            ))
        ),
        GitInit::AlreadyInitialized => {}
        GitInit::GitMissing => {
            eprintln!("{}", formatter.warning("git not found; skipping repository setup"))
        }
        GitInit::Failed(stderr) => {
            eprintln!("{}", formatter.warning(&format!("git init failed: {}", stderr)))
        }
    }

    let generator = SiteGenerator::new(
        config.page_provider(args.model.as_deref())?,
        config.extractor.clone(),
    )?;
    ensure_model(session, generator.provider(), formatter).await?;

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    let extension = generator.extractor().filename_extension().to_string();
    let named = generator
        .suggest_filename(&task)
        .await
        .or_fallback(|| fallback_filename(now, &extension));
    if let Some(reason) = &named.fallback_reason {
        warn!("Filename suggestion failed: {}", reason);
    }
    let filename = named.value;

    if let CreateOutcome::AlreadyExists(path) = workspace.create_file(&filename)? {
        eprintln!(
            "{}",
            formatter.warning(&format!("File {} already exists. Skipping.", path.display()))
        );
        return Ok(());
    }

    let written = generator
        .write_page(&task, &filename)
        .await
        .or_fallback(|| FALLBACK_PAGE.to_string());
    if let Some(reason) = &written.fallback_reason {
        warn!("Page generation failed: {}", reason);
        eprintln!(
            "{}",
            formatter.warning("Using empty page template due to generation failure.")
        );
    }

    let page = PageArtifact {
        filename,
        code: written.value,
    };
    let path = workspace.write_page(&page.filename, &page.code)?;
    workspace.log_task(&task, &page.filename)?;

    println!("{}", formatter.format_page(&page)?);
    eprintln!(
        "{}",
        formatter.success(&format!("Created {}", path.display()))
    );

    if !args.no_editor {
        match VsCode::discover(&config.workspace.editor_commands).await {
            Ok(editor) => {
                if let Err(e) = editor.open(workspace.root(), &path).await {
                    eprintln!("{}", formatter.warning(&format!("Could not open VS Code: {}", e)));
                }
            }
            Err(_) => {
                eprintln!("{}", formatter.warning("VS Code command line not found."));
                eprintln!("{}", INSTALL_HINT);
            }
        }
    }

    Ok(())
}
