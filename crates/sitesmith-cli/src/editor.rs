//! VS Code command-line integration.

use crate::error::{CliError, Result};
use crate::workspace::LIVE_SERVER_TASK;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{debug, info};

/// A VS Code command line that answered `--version`
#[derive(Debug, Clone)]
pub struct VsCode {
    binary: PathBuf,
}

impl VsCode {
    /// Try each candidate in order and keep the first working one
    ///
    /// Candidates are command names looked up on PATH or absolute paths.
    pub async fn discover(candidates: &[String]) -> Result<Self> {
        for candidate in candidates {
            let Ok(binary) = which::which(candidate) else {
                debug!("VS Code candidate {} not found", candidate);
                continue;
            };

            match Command::new(&binary).arg("--version").output().await {
                Ok(output) if output.status.success() => {
                    let version = String::from_utf8_lossy(&output.stdout);
                    debug!(
                        "Using VS Code {} at {}",
                        version.lines().next().unwrap_or("unknown"),
                        binary.display()
                    );
                    return Ok(Self { binary });
                }
                Ok(output) => debug!("{} --version exited with {}", binary.display(), output.status),
                Err(e) => debug!("{} --version failed: {}", binary.display(), e),
            }
        }

        Err(CliError::EditorNotFound)
    }

    /// Resolved executable
    pub fn binary(&self) -> &Path {
        &self.binary
    }

    /// Open `file` in a new window rooted at `workspace`
    pub async fn open(&self, workspace: &Path, file: &Path) -> Result<()> {
        let uri = folder_uri(workspace)?;
        self.run([
            OsStr::new("--new-window"),
            OsStr::new("--folder-uri"),
            OsStr::new(&uri),
            file.as_os_str(),
        ])
        .await?;
        info!("Opened {} in VS Code", file.display());
        Ok(())
    }

    /// Open `workspace` and run its Live Server task
    pub async fn start_live_server(&self, workspace: &Path) -> Result<()> {
        let uri = folder_uri(workspace)?;
        self.run(["--new-window", "--folder-uri", uri.as_str()]).await?;
        self.run([
            "--folder-uri",
            uri.as_str(),
            "--command",
            "workbench.action.tasks.runTask",
            LIVE_SERVER_TASK,
        ])
        .await
    }

    async fn run<I, S>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let args: Vec<OsString> = args.into_iter().map(|a| a.as_ref().to_os_string()).collect();
        let output = Command::new(&self.binary).args(&args).output().await?;
        if output.status.success() {
            return Ok(());
        }

        let rendered: Vec<String> = args.iter().map(|a| a.to_string_lossy().into_owned()).collect();
        Err(CliError::CommandFailed {
            command: format!("{} {}", self.binary.display(), rendered.join(" ")),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// `file://` URI for a directory, made absolute first
pub fn folder_uri(dir: &Path) -> Result<String> {
    let absolute = dir.canonicalize()?;
    Ok(format!("file://{}", absolute.display()))
}

/// Setup hints printed when no VS Code CLI is found
pub const INSTALL_HINT: &str = "1. Install VS Code: https://code.visualstudio.com/\n\
2. Open the Command Palette and run 'Shell Command: Install code command in PATH'\n\
3. Verify: run 'code --version'\n\
See: https://code.visualstudio.com/docs/setup/setup-overview";
