//! Preview server command implementation.

use crate::browser::open_browser;
use crate::cli::ServeArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use crate::session::SessionContext;
use sitesmith_preview::{PreviewConfig, PreviewServer};
use tracing::warn;

/// Replace the session's preview with one serving `config.root_dir`
///
/// Prints the URL and opens a browser unless `open` is false.
pub async fn start_preview(
    config: &PreviewConfig,
    session: &mut SessionContext,
    formatter: &Formatter,
    open: bool,
) -> Result<()> {
    session.stop_preview().await;

    let server = PreviewServer::start(config).await?;
    let url = server.url();
    println!("{}", formatter.preview_url(&url));

    if open {
        if let Err(e) = open_browser(&url) {
            warn!("Failed to open browser: {}", e);
            eprintln!(
                "{}",
                formatter.warning(&format!("Could not open a browser; visit {} manually", url))
            );
        }
    }

    session.preview = Some(server);
    Ok(())
}

/// Execute the serve command.
pub async fn execute_serve(
    args: ServeArgs,
    config: &Config,
    session: &mut SessionContext,
    formatter: &Formatter,
) -> Result<()> {
    let mut preview = config.preview.clone();
    if let Some(dir) = args.dir {
        preview.root_dir = dir;
    }
    if let Some(port) = args.port {
        preview.start_port = port;
    }

    start_preview(&preview, session, formatter, !args.no_browser).await
}
