//! Opening preview URLs in the default browser.

use tracing::debug;

/// Open `url` with the platform's default handler
///
/// Callers treat a failure as a warning; the URL is printed either way.
pub fn open_browser(url: &str) -> std::io::Result<()> {
    debug!("Opening {} in browser", url);
    open::that_detached(url)
}
