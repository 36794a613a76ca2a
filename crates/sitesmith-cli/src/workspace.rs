//! Page workspace: git repository, page files, task log.

use crate::error::{CliError, Result};
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

const README: &str = "# HTML Project Workspace\nGenerated by Sitesmith\n";
const GITIGNORE: &str = "*.pyc\n__pycache__/\nnode_modules/\n";
const TASK_LOG: &str = "task_log.txt";

/// Outcome of initializing version control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitInit {
    /// `.git` already present; nothing done
    AlreadyInitialized,
    /// Repository created along with README.md and .gitignore
    Initialized,
    /// `git` is not on PATH
    GitMissing,
    /// `git init` ran and failed
    Failed(String),
}

/// Outcome of creating a page file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    /// A new empty file
    Created(PathBuf),
    /// The name is taken; the file was left alone
    AlreadyExists(PathBuf),
}

/// Directory holding generated pages
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    /// Open `root`, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Workspace directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of a file inside the workspace
    pub fn path(&self, filename: &str) -> PathBuf {
        self.root.join(filename)
    }

    /// Run `git init` and seed README.md and .gitignore
    ///
    /// A missing or failing git is reported, never an error.
    pub async fn init_git(&self) -> Result<GitInit> {
        if self.root.join(".git").exists() {
            return Ok(GitInit::AlreadyInitialized);
        }

        let git = match which::which("git") {
            Ok(git) => git,
            Err(_) => return Ok(GitInit::GitMissing),
        };

        let output = tokio::process::Command::new(git)
            .arg("init")
            .current_dir(&self.root)
            .output()
            .await?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            return Ok(GitInit::Failed(stderr));
        }

        fs::write(self.root.join("README.md"), README)?;
        fs::write(self.root.join(".gitignore"), GITIGNORE)?;
        info!("Initialized git repository in {}", self.root.display());
        Ok(GitInit::Initialized)
    }

    /// Create an empty page file, refusing to touch an existing one
    pub fn create_file(&self, filename: &str) -> Result<CreateOutcome> {
        let path = self.path(filename);
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(_) => {
                debug!("Created {}", path.display());
                Ok(CreateOutcome::Created(path))
            }
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(CreateOutcome::AlreadyExists(path)),
            Err(e) => Err(CliError::Io(e)),
        }
    }

    /// Write page code
    pub fn write_page(&self, filename: &str, code: &str) -> Result<PathBuf> {
        let path = self.path(filename);
        fs::write(&path, code)?;
        Ok(path)
    }

    /// Append a task entry to `task_log.txt`
    pub fn log_task(&self, task: &str, filename: &str) -> Result<()> {
        let mut log = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.root.join(TASK_LOG))?;
        let timestamp = Local::now().format("%a %b %e %H:%M:%S %Y");
        write!(log, "Task: {}\nFile: {}\nTimestamp: {}\n\n", task, filename, timestamp)?;
        Ok(())
    }

    /// Write `.vscode/tasks.json` with the "Live Server" task
    pub fn write_live_server_task(&self) -> Result<PathBuf> {
        let dir = self.root.join(".vscode");
        fs::create_dir_all(&dir)?;

        let tasks = serde_json::json!({
            "version": "2.0.0",
            "tasks": [
                {
                    "label": LIVE_SERVER_TASK,
                    "type": "shell",
                    "command": "code --command live-server.goLive",
                    "group": {
                        "kind": "build",
                        "isDefault": true
                    }
                }
            ]
        });

        let path = dir.join("tasks.json");
        fs::write(&path, serde_json::to_string_pretty(&tasks)?)?;
        Ok(path)
    }
}

/// Label of the VS Code task that starts Live Server
pub const LIVE_SERVER_TASK: &str = "Live Server";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_file_once() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path().join("ws")).unwrap();

        let first = workspace.create_file("todo.html").unwrap();
        assert_eq!(first, CreateOutcome::Created(workspace.path("todo.html")));

        workspace.write_page("todo.html", "<p>keep</p>").unwrap();
        let second = workspace.create_file("todo.html").unwrap();
        assert_eq!(second, CreateOutcome::AlreadyExists(workspace.path("todo.html")));
        assert_eq!(
            fs::read_to_string(workspace.path("todo.html")).unwrap(),
            "<p>keep</p>"
        );
    }

    #[test]
    fn test_task_log_appends() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path()).unwrap();

        workspace.log_task("todo list", "todo_list.html").unwrap();
        workspace.log_task("stopwatch", "stopwatch.html").unwrap();

        let log = fs::read_to_string(dir.path().join(TASK_LOG)).unwrap();
        assert!(log.starts_with("Task: todo list\nFile: todo_list.html\nTimestamp: "));
        assert!(log.contains("Task: stopwatch\nFile: stopwatch.html\n"));
        assert_eq!(log.matches("\n\n").count(), 2);
    }

    #[test]
    fn test_live_server_task() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path()).unwrap();

        let path = workspace.write_live_server_task().unwrap();
        let tasks: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(tasks["tasks"][0]["label"], LIVE_SERVER_TASK);
        assert_eq!(tasks["tasks"][0]["group"]["isDefault"], true);
    }

    #[tokio::test]
    async fn test_init_git() {
        let dir = tempfile::tempdir().unwrap();
        let workspace = Workspace::open(dir.path()).unwrap();

        match workspace.init_git().await.unwrap() {
            GitInit::Initialized => {
                assert!(dir.path().join(".git").exists());
                assert_eq!(
                    fs::read_to_string(dir.path().join("README.md")).unwrap(),
                    README
                );
                assert_eq!(
                    fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
                    GITIGNORE
                );
                assert_eq!(
                    workspace.init_git().await.unwrap(),
                    GitInit::AlreadyInitialized
                );
            }
            // Hosts without git still report instead of failing
            GitInit::GitMissing | GitInit::Failed(_) => {}
            GitInit::AlreadyInitialized => panic!("fresh directory reported as initialized"),
        }
    }
}
