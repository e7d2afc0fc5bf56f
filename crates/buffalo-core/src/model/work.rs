use serde::{Deserialize, Serialize};
use std::fmt;

use crate::model::status::WorkStatus;

/// A single step of a workflow.
///
/// Works are listed in a workflow template and copied into every project
/// created from it. The `index` is the 1-based position within the
/// workflow and is derived on load rather than persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Work {
    #[serde(skip)]
    pub index: usize,

    pub name: String,

    pub status: WorkStatus,

    /// File the work is expected to produce, relative to the project directory.
    pub output_file: String,

    pub comment: String,
}

impl Work {
    #[must_use]
    pub fn new(
        index: usize,
        name: impl Into<String>,
        output_file: impl Into<String>,
        comment: impl Into<String>,
    ) -> Self {
        Self {
            index,
            name: name.into(),
            status: WorkStatus::NotStarted,
            output_file: output_file.into(),
            comment: comment.into(),
        }
    }

    #[must_use]
    pub fn with_status(mut self, status: WorkStatus) -> Self {
        self.status = status;
        self
    }

    pub fn set_status(&mut self, status: WorkStatus) {
        self.status = status;
    }

    #[must_use]
    pub fn is_not_started(&self) -> bool {
        self.status == WorkStatus::NotStarted
    }

    #[must_use]
    pub fn is_in_progress(&self) -> bool {
        self.status == WorkStatus::InProgress
    }

    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == WorkStatus::Done
    }
}

impl fmt::Display for Work {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Work(index={}, name={}, status={}, output_file={}, comment={})",
            self.index, self.name, self.status, self.output_file, self.comment
        )
    }
}
