//! Manifest rendering and persistence.
//!
//! The generated file is the serialized manifest behind a one-line
//! disclaimer. Writes go to a temporary sibling first and are renamed into
//! place, so readers never observe a half-written manifest.

use crate::error::{Error, Result};
use crate::models::Manifest;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

/// First line of every generated manifest.
pub const DISCLAIMER: &str = "# This file is auto-generated. Do not edit it directly. Use npm run createDocsRoutes instead.\n";

/// Serialize the manifest to YAML, prefixed with [`DISCLAIMER`].
pub fn render(manifest: &Manifest) -> Result<String> {
    let yaml = serde_yaml::to_string(manifest).map_err(Error::Serialize)?;
    Ok(format!("{DISCLAIMER}{yaml}"))
}

/// Write the rendered manifest to `path`, replacing any previous file.
///
/// # Errors
///
/// Returns [`Error::Io`] if the parent directory cannot be created or the
/// temporary file cannot be written or renamed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn write_manifest(path: &Path, rendered: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }

    let temp_path = temp_sibling(path);
    fs::write(&temp_path, rendered)
        .await
        .map_err(|e| Error::io(&temp_path, e))?;

    if let Err(e) = fs::rename(&temp_path, path).await {
        let _ = fs::remove_file(&temp_path).await;
        return Err(Error::io(path, e));
    }

    info!(bytes = rendered.len(), "Wrote routes manifest");
    Ok(())
}

/// Compare the rendered manifest with the file at `path`.
///
/// A missing file counts as out of date.
///
/// # Errors
///
/// Returns [`Error::OutputStale`] if the contents differ, or [`Error::Io`]
/// if the existing file cannot be read.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn check_manifest(path: &Path, rendered: &str) -> Result<()> {
    let existing = match fs::read_to_string(path).await {
        Ok(existing) => existing,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Generated manifest does not exist yet");
            return Err(Error::OutputStale {
                path: path.to_path_buf(),
            });
        }
        Err(e) => return Err(Error::io(path, e)),
    };

    if existing != rendered {
        return Err(Error::OutputStale {
            path: path.to_path_buf(),
        });
    }

    debug!("Generated manifest is up to date");
    Ok(())
}

/// `.routes.yml.<pid>.tmp` next to `routes.yml`, on the same filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let temp_name = format!(
        ".{}.{}.tmp",
        path.file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default(),
        std::process::id()
    );
    path.with_file_name(temp_name)
}
