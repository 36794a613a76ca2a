//! Site command implementation.

use super::pull::ensure_model;
use super::serve::start_preview;
use crate::artifacts::write_site;
use crate::cli::SiteArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::SessionContext;
use sitesmith_domain::GenerationRequest;
use sitesmith_extractor::templates::default_website;
use sitesmith_extractor::SiteGenerator;
use tracing::{info, warn};

/// Description used when none is given
pub const DEFAULT_DESCRIPTION: &str = "Create a portfolio website for a photographer with a gallery, about section, and contact form.";

/// Execute the site command.
pub async fn execute_site(
    args: SiteArgs,
    config: &Config,
    session: &mut SessionContext,
    formatter: &Formatter,
) -> Result<()> {
    let generator = SiteGenerator::new(
        config.site_provider(args.model.as_deref())?,
        config.extractor.clone(),
    )?;
    ensure_model(session, generator.provider(), formatter).await?;

    let description = args
        .description_text()
        .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
    session.prompt_history.record(&description);

    let request = GenerationRequest::new(description, args.style, args.framework);
    eprintln!("{}", formatter.info("Generating website..."));

    let resolved = generator.generate_site(&request).await.or_fallback(default_website);
    if let Some(reason) = &resolved.fallback_reason {
        warn!("Site generation failed after {} attempt(s): {}", resolved.attempts, reason);
        eprintln!(
            "{}",
            formatter.warning("Using default website template due to generation failure.")
        );
    } else {
        info!("Site generated in {} attempt(s)", resolved.attempts);
    }

    let site = resolved.value;
    let output = formatter.format_site(&site)?;
    if !output.is_empty() {
        println!("{}", output);
    }

    let mut preview = config.preview.clone();
    if let Some(dir) = args.output {
        preview.root_dir = dir;
    }

    write_site(&preview.root_dir, &site)?;
    println!("{}", formatter.success("Website compiled successfully!"));

    if !args.no_preview {
        start_preview(&preview, session, formatter, !args.no_browser).await?;
    }

    Ok(())
}
