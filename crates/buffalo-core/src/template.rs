//! The workflow template bundled with buffalo.

use std::path::{Path, PathBuf};

use crate::error::Result;

/// File name used when the bundled template is written to disk.
pub const TEMPLATE_FILE_NAME: &str = "wf_template.yml";

const DEFAULT_TEMPLATE: &str = include_str!("../templates/wf_template.yml");

/// The bundled workflow template.
#[must_use]
pub fn default_template() -> &'static str {
    DEFAULT_TEMPLATE
}

/// Write the bundled template to `dir/wf_template.yml` unless a file is
/// already there, and return its path.
pub fn ensure_default_template(dir: &Path) -> Result<PathBuf> {
    let path = dir.join(TEMPLATE_FILE_NAME);
    if path.exists() {
        return Ok(path);
    }

    std::fs::create_dir_all(dir)?;
    std::fs::write(&path, DEFAULT_TEMPLATE)?;
    log::info!("Wrote default workflow template to {}", path.display());
    Ok(path)
}

/// Pick the template to use: an explicit path wins, then the configured one,
/// then the bundled template written under `base_dir`.
pub fn resolve_template(
    explicit: Option<&Path>,
    configured: Option<&Path>,
    base_dir: &Path,
) -> Result<PathBuf> {
    match explicit.or(configured) {
        Some(path) => Ok(path.to_path_buf()),
        None => ensure_default_template(base_dir),
    }
}
