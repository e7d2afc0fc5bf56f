use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

/// Progress of a single work within a project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    #[default]
    NotStarted,
    InProgress,
    Done,
}

impl WorkStatus {
    /// The string used for this status in project files and on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl FromStr for WorkStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(Error::InvalidStatus(other.to_string())),
        }
    }
}

impl fmt::Display for WorkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_parse() {
        assert_eq!("not_started".parse::<WorkStatus>().unwrap(), WorkStatus::NotStarted);
        assert_eq!("in_progress".parse::<WorkStatus>().unwrap(), WorkStatus::InProgress);
        assert_eq!(" done ".parse::<WorkStatus>().unwrap(), WorkStatus::Done);
    }

    #[test]
    fn test_status_parse_rejects_unknown() {
        let err = "finished".parse::<WorkStatus>().unwrap_err();
        assert!(matches!(err, Error::InvalidStatus(ref s) if s == "finished"));
    }

    #[test]
    fn test_status_serializes_as_snake_case() {
        let yaml = serde_yaml::to_string(&WorkStatus::InProgress).unwrap();
        assert_eq!(yaml.trim(), "in_progress");
    }

    #[test]
    fn test_status_default_is_not_started() {
        assert_eq!(WorkStatus::default(), WorkStatus::NotStarted);
        assert_eq!(WorkStatus::default().to_string(), "not_started");
    }
}
