//! Reading and writing YAML documents on disk.
//!
//! Failures are reported as [`YamlFileError`] so that callers can decide
//! which domain error a bad file maps to (a broken template is a workflow
//! error, a broken project file is a load error).

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum YamlFileError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Load a YAML file into `T`.
pub fn load_yaml_file<T: DeserializeOwned>(
    path: impl AsRef<Path>,
) -> Result<T, YamlFileError> {
    let contents = std::fs::read_to_string(path.as_ref())?;
    Ok(serde_yaml::from_str(&contents)?)
}

/// Serialize `value` as YAML into `path`, creating parent directories.
pub fn save_yaml_file<T: Serialize>(
    path: impl AsRef<Path>,
    value: &T,
) -> Result<(), YamlFileError> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let contents = serde_yaml::to_string(value)?;
    std::fs::write(path, contents)?;
    Ok(())
}
