use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("project load error: {0}")]
    ProjectLoad(String),

    #[error("project save error: {0}")]
    ProjectSave(String),

    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The workflow description could not be parsed at all.
    #[error("workflow format error: {0}")]
    WorkflowFormat(String),

    /// The workflow description parsed but lacks required fields.
    #[error("workflow description error: {0}")]
    WorkflowDescription(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid work status: {0} (expected not_started, in_progress or done)")]
    InvalidStatus(String),

    #[error("project not found: {0}")]
    ProjectNotFound(String),

    #[error("unsupported file type: {}", .0.display())]
    UnsupportedFileType(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Returns `true` for errors caused by a missing file, directory or project.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::FileNotFound(_) | Self::ProjectNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
