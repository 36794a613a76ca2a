//! Live Server command implementation.

use crate::cli::LiveArgs;
use crate::config::Config;
use crate::editor::{VsCode, INSTALL_HINT};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::workspace::Workspace;

/// Execute the live command.
pub async fn execute_live(args: LiveArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let workspace = Workspace::open(args.workspace.unwrap_or_else(|| config.workspace.dir.clone()))?;
    workspace.write_live_server_task()?;

    let editor = match VsCode::discover(&config.workspace.editor_commands).await {
        Ok(editor) => editor,
        Err(CliError::EditorNotFound) => {
            eprintln!("{}", formatter.warning("VS Code command line not found."));
            eprintln!("{}", INSTALL_HINT);
            return Err(CliError::EditorNotFound);
        }
        Err(e) => return Err(e),
    };

    editor.start_live_server(workspace.root()).await?;
    println!(
        "{}",
        formatter.success(&format!(
            "Live Server started for {}",
            workspace.root().display()
        ))
    );
    Ok(())
}
