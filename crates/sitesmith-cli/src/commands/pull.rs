//! Model availability and pull command implementation.

use crate::cli::PullArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::session::SessionContext;
use sitesmith_llm::ollama::find_ollama_binary;
use sitesmith_llm::OllamaProvider;
use tracing::debug;

/// Make sure the provider's model is installed, pulling it if needed
///
/// Skipped once the session has confirmed this particular model.
pub async fn ensure_model(
    session: &mut SessionContext,
    provider: &OllamaProvider,
    formatter: &Formatter,
) -> Result<()> {
    if session.is_model_confirmed(provider.model()) {
        debug!("Model {} already confirmed in session", provider.model());
        return Ok(());
    }

    find_ollama_binary()?;

    if !provider.is_reachable().await {
        return Err(CliError::OllamaUnavailable(provider.endpoint().to_string()));
    }

    if provider.has_model().await? {
        session.confirm_model(provider.model());
        return Ok(());
    }

    eprintln!(
        "{}",
        formatter.info(&format!("Model {} not found. Pulling it now...", provider.model()))
    );
    provider.pull_model().await?;

    if !provider.has_model().await? {
        return Err(CliError::ModelMissing(provider.model().to_string()));
    }

    eprintln!(
        "{}",
        formatter.success(&format!("Model {} pulled successfully!", provider.model()))
    );
    session.confirm_model(provider.model());
    Ok(())
}

/// Execute the pull command.
pub async fn execute_pull(
    args: PullArgs,
    config: &Config,
    session: &mut SessionContext,
    formatter: &Formatter,
) -> Result<()> {
    let provider = config.site_provider(args.model.as_deref())?;

    eprintln!("{}", formatter.info(&format!("Pulling {}...", provider.model())));
    provider.pull_model().await?;

    // A forced pull means the next generation re-checks availability
    session.forget_model(provider.model());
    println!(
        "{}",
        formatter.success(&format!("Model {} pulled successfully!", provider.model()))
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;

    #[tokio::test]
    async fn test_confirmed_session_skips_checks() {
        // Nothing listens on this endpoint; a confirmed session never calls it
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3.2:latest").unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut session = SessionContext::new();
        session.confirm_model("llama3.2:latest");

        assert!(ensure_model(&mut session, &provider, &formatter).await.is_ok());
        assert!(session.is_model_confirmed("llama3.2:latest"));
    }

    #[tokio::test]
    async fn test_other_confirmed_model_does_not_skip_checks() {
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3.2:latest")
            .unwrap()
            .with_max_retries(1);
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut session = SessionContext::new();
        session.confirm_model("deepseek-r1:7b");

        let result = ensure_model(&mut session, &provider, &formatter).await;

        // The site model is still checked, and fails against a dead endpoint
        assert!(matches!(
            result,
            Err(CliError::OllamaUnavailable(_)) | Err(CliError::Llm(_))
        ));
        assert!(!session.is_model_confirmed("llama3.2:latest"));
        assert!(session.is_model_confirmed("deepseek-r1:7b"));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_reported() {
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llama3.2:latest")
            .unwrap()
            .with_max_retries(1);
        let formatter = Formatter::new(OutputFormat::Table, false);
        let mut session = SessionContext::new();

        let result = ensure_model(&mut session, &provider, &formatter).await;

        // Without an ollama binary the tool check fails first
        assert!(matches!(
            result,
            Err(CliError::OllamaUnavailable(_)) | Err(CliError::Llm(_))
        ));
        assert!(!session.is_model_confirmed("llama3.2:latest"));
    }
}
