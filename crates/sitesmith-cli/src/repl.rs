//! Interactive REPL (Read-Eval-Print Loop) mode.

use crate::cli::{Command, LiveArgs, PageArgs, PullArgs, ServeArgs, SiteArgs};
use crate::commands;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::SessionContext;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};
use sitesmith_domain::{Framework, Style};
use std::path::PathBuf;

/// Run the interactive REPL.
pub async fn run_repl(
    config: &Config,
    session: &mut SessionContext,
    formatter: &Formatter,
) -> Result<()> {
    println!(
        "{}",
        formatter.info("Sitesmith REPL - Type 'help' for commands, 'exit' to quit")
    );
    println!();

    let editor_config = EditorConfig::builder()
        .max_history_size(config.settings.history_size)
        .map_err(|e| CliError::Config(format!("Invalid history size: {}", e)))?
        .build();
    let mut editor = DefaultEditor::with_config(editor_config).map_err(|e| {
        CliError::Io(std::io::Error::other(format!(
            "Failed to initialize editor: {}",
            e
        )))
    })?;

    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    loop {
        let prompt = if session.preview.is_some() {
            "sitesmith (serving)> "
        } else {
            "sitesmith> "
        };

        match editor.readline(prompt) {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                editor.add_history_entry(line).ok();

                match parse_repl_command(line, session) {
                    Ok(ReplCommand::Exit) => {
                        println!("{}", formatter.info("Goodbye!"));
                        break;
                    }
                    Ok(ReplCommand::Help) => print_help(formatter),
                    Ok(ReplCommand::Stop) => {
                        if session.stop_preview().await {
                            println!("{}", formatter.success("Preview server stopped"));
                        } else {
                            println!("{}", formatter.info("No preview server running"));
                        }
                    }
                    Ok(ReplCommand::History) => match formatter.format_history(&session.prompt_history) {
                        Ok(output) => println!("{}", output),
                        Err(e) => eprintln!("{}", formatter.error(&e.to_string())),
                    },
                    Ok(ReplCommand::Tasks) => {
                        if session.task_history.is_empty() {
                            println!("{}", formatter.info("No tasks yet"));
                        }
                        for (idx, task) in session.task_history.iter().enumerate() {
                            println!("  {}. {}", idx + 1, task);
                        }
                    }
                    Ok(ReplCommand::Command(cmd)) => {
                        if let Err(e) = execute_repl_command(cmd, config, session, formatter).await {
                            eprintln!("{}", formatter.error(&e.to_string()));
                        }
                    }
                    Err(e) => {
                        eprintln!("{}", formatter.error(&e.to_string()));
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    session.stop_preview().await;
    editor.save_history(&history_path).ok();

    Ok(())
}

/// REPL command type.
#[derive(Debug)]
enum ReplCommand {
    Exit,
    Help,
    Stop,
    History,
    Tasks,
    Command(Command),
}

/// Parse a REPL command line.
fn parse_repl_command(line: &str, session: &SessionContext) -> Result<ReplCommand> {
    let parts: Vec<&str> = line.split_whitespace().collect();

    if parts.is_empty() {
        return Err(CliError::InvalidInput("Empty command".to_string()));
    }

    match parts[0] {
        "exit" | "quit" | "q" => Ok(ReplCommand::Exit),
        "help" | "?" => Ok(ReplCommand::Help),
        "stop" => Ok(ReplCommand::Stop),
        "history" => Ok(ReplCommand::History),
        "tasks" => Ok(ReplCommand::Tasks),
        "site" => parse_site_command(&parts[1..], session),
        "page" => parse_page_command(&parts[1..]),
        "live" => Ok(ReplCommand::Command(Command::Live(LiveArgs::default()))),
        "serve" => Ok(ReplCommand::Command(Command::Serve(ServeArgs {
            dir: parts.get(1).map(PathBuf::from),
            port: None,
            no_browser: false,
        }))),
        "pull" => Ok(ReplCommand::Command(Command::Pull(PullArgs {
            model: parts.get(1).map(|s| s.to_string()),
        }))),
        "models" => Ok(ReplCommand::Command(Command::Models)),
        _ => Err(CliError::InvalidInput(format!(
            "Unknown command: {}. Type 'help' for available commands.",
            parts[0]
        ))),
    }
}

/// Execute a REPL command.
async fn execute_repl_command(
    cmd: Command,
    config: &Config,
    session: &mut SessionContext,
    formatter: &Formatter,
) -> Result<()> {
    match cmd {
        Command::Site(args) => commands::execute_site(args, config, session, formatter).await,
        Command::Page(args) => commands::execute_page(args, config, session, formatter).await,
        Command::Live(args) => commands::execute_live(args, config, formatter).await,
        Command::Serve(args) => commands::execute_serve(args, config, session, formatter).await,
        Command::Pull(args) => commands::execute_pull(args, config, session, formatter).await,
        Command::Models => commands::execute_models(config, formatter).await,
        Command::Repl => Err(CliError::InvalidInput("Already in REPL mode".to_string())),
    }
}

// Format: site [--style <style>] [--framework <framework>] [!N | description...]
fn parse_site_command(args: &[&str], session: &SessionContext) -> Result<ReplCommand> {
    let mut site = SiteArgs::default();
    let mut words = Vec::new();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match *arg {
            "--style" | "-s" => {
                let value = iter.next().ok_or_else(|| {
                    CliError::InvalidInput("Usage: site --style <style> <description>".to_string())
                })?;
                site.style = value.parse::<Style>().map_err(CliError::InvalidInput)?;
            }
            "--framework" => {
                let value = iter.next().ok_or_else(|| {
                    CliError::InvalidInput(
                        "Usage: site --framework <framework> <description>".to_string(),
                    )
                })?;
                site.framework = value.parse::<Framework>().map_err(CliError::InvalidInput)?;
            }
            word => words.push(word.to_string()),
        }
    }

    // `!N` reuses the Nth entry of `history`
    let recall = match words.as_slice() {
        [word] if word.starts_with('!') => Some(word.clone()),
        _ => None,
    };
    if let Some(recall) = recall {
        let prompt = recall[1..]
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|n| session.prompt_history.get(n))
            .ok_or_else(|| CliError::InvalidInput(format!("No prompt {} in history", recall)))?;
        words = vec![prompt.to_string()];
    }

    site.description = words;
    Ok(ReplCommand::Command(Command::Site(site)))
}

fn parse_page_command(args: &[&str]) -> Result<ReplCommand> {
    if args.is_empty() {
        return Err(CliError::InvalidInput("Usage: page <task>".to_string()));
    }

    Ok(ReplCommand::Command(Command::Page(PageArgs {
        task: args.iter().map(|s| s.to_string()).collect(),
        ..PageArgs::default()
    })))
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::home_dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  site [options] [description]   - Generate and preview a website");
    println!("    --style <s>      modern-gradient|minimalistic|bold-and-colorful|classic");
    println!("    --framework <f>  none|tailwind|bootstrap");
    println!("    !N               reuse prompt N from 'history'");
    println!("  page <task>                    - Generate a single page in the workspace");
    println!("  live                           - Start VS Code Live Server for the workspace");
    println!("  serve [dir]                    - Preview an existing directory");
    println!("  stop                           - Stop the preview server");
    println!("  pull [model]                   - Pull a model with ollama");
    println!("  models                         - List installed models");
    println!("  history                        - Show recent site prompts");
    println!("  tasks                          - Show page tasks from this session");
    println!("  help, ?                        - Show this help");
    println!("  exit, quit, q                  - Exit REPL");
    println!();
}
