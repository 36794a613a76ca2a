//! Writing generated sites to disk.

use crate::error::{CliError, Result};
use sitesmith_domain::SiteArtifact;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Write `index.html`, `styles.css` and `script.js` into `dir`
///
/// The directory is created if needed. Every file is checked before any is
/// written, so an empty section never leaves a half-written site behind.
pub fn write_site(dir: &Path, site: &SiteArtifact) -> Result<Vec<PathBuf>> {
    let files = site.files();
    if let Some((name, _)) = files.iter().find(|(_, content)| content.is_empty()) {
        return Err(CliError::EmptyArtifact(name.to_string()));
    }

    fs::create_dir_all(dir)?;
    if fs::metadata(dir)?.permissions().readonly() {
        return Err(CliError::NotWritable(dir.to_path_buf()));
    }

    let mut written = Vec::with_capacity(files.len());
    for (name, content) in files {
        let path = dir.join(name);
        fs::write(&path, content)?;
        written.push(path);
    }

    info!("Wrote {} files to {}", written.len(), dir.display());
    Ok(written)
}
