//! Models command implementation.

use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;

/// Execute the models command.
pub async fn execute_models(config: &Config, formatter: &Formatter) -> Result<()> {
    let provider = config.site_provider(None)?;

    if !provider.is_reachable().await {
        return Err(CliError::OllamaUnavailable(provider.endpoint().to_string()));
    }

    let mut models = provider.list_models().await?;
    models.sort_by(|a, b| a.name.cmp(&b.name));

    println!("{}", formatter.format_models(&models)?);
    Ok(())
}
