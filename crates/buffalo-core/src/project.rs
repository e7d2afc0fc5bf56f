//! A project is a directory tracking the progress of one workflow.
//!
//! The project directory lives at `<base_dir>/<name>` and holds a
//! `workflow.yml` with the status of every work. Projects are created from
//! a workflow template and persisted after every status change.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::model::{Work, WorkStatus};
use crate::yaml::{load_yaml_file, save_yaml_file};

/// Name of the file holding a project's saved state.
pub const PROJECT_FILE_NAME: &str = "workflow.yml";

/// Characters that may not appear in a project name.
const INVALID_NAME_CHARS: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

/// Longest accepted project name, in characters.
const MAX_NAME_LEN: usize = 255;

// ---------------------------------------------------------------------------
// On-disk documents
// ---------------------------------------------------------------------------

/// Loosely-typed view of a template or saved project, so that missing
/// fields can be reported by name.
#[derive(Debug, Deserialize)]
struct RawDocument {
    name: Option<String>,
    workflow: Option<RawWorkflow>,
}

#[derive(Debug, Deserialize)]
struct RawWorkflow {
    works: Option<Vec<RawWork>>,
}

/// Each field is `None` when the key is absent and `Some(None)` when the
/// key is present with a null value.
#[derive(Debug, Deserialize)]
struct RawWork {
    #[serde(default, deserialize_with = "present")]
    name: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    status: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    output_file: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    comment: Option<Option<String>>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl RawWork {
    /// Check that every key is present and build the work plus its raw status.
    ///
    /// Null values are read as empty strings.
    fn into_work(self, index: usize) -> std::result::Result<(Work, String), String> {
        let name = self
            .name
            .ok_or_else(|| String::from("missing name field in work"))?
            .unwrap_or_default();
        let status = self
            .status
            .ok_or_else(|| format!("missing status field in work {name}"))?
            .unwrap_or_default();
        let output_file = self
            .output_file
            .ok_or_else(|| format!("missing output_file field in work {name}"))?
            .unwrap_or_default();
        let comment = self
            .comment
            .ok_or_else(|| format!("missing comment field in work {name}"))?
            .unwrap_or_default();

        Ok((Work::new(index, name, output_file, comment), status))
    }
}

#[derive(Debug, Serialize)]
struct SavedProject<'a> {
    name: &'a str,
    workflow: SavedWorkflow<'a>,
}

#[derive(Debug, Serialize)]
struct SavedWorkflow<'a> {
    works: &'a [Work],
}

// ---------------------------------------------------------------------------
// Next work
// ---------------------------------------------------------------------------

/// Result of looking for the next work that has not been started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextWork<'a> {
    /// The work is the first of the workflow, or its predecessor is done.
    Ready(&'a Work),
    /// The work exists but its predecessor is not done yet.
    Blocked(&'a Work),
    /// Every work has been started.
    Exhausted,
}

impl<'a> NextWork<'a> {
    #[must_use]
    pub const fn work(&self) -> Option<&'a Work> {
        match *self {
            Self::Ready(work) | Self::Blocked(work) => Some(work),
            Self::Exhausted => None,
        }
    }

    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

// ---------------------------------------------------------------------------
// Project
// ---------------------------------------------------------------------------

/// A named project and the works of its workflow.
///
/// Use [`crate::Buffalo`] to create and look up projects under a base
/// directory; constructing a `Project` directly is mostly useful for tests
/// and single-project tooling.
#[derive(Debug, Clone)]
pub struct Project {
    name: String,
    works: Vec<Work>,
    project_path: Option<PathBuf>,
    template_path: Option<PathBuf>,
}

impl Project {
    /// Create an in-memory project without touching the disk.
    ///
    /// Without a `base_dir` the project is detached: it cannot be saved and
    /// files cannot be copied into it.
    pub fn new(name: impl Into<String>, base_dir: Option<&Path>) -> Result<Self> {
        let name = name.into();
        validate_name(&name)?;

        let project_path = base_dir.map(|dir| dir.join(&name));
        Ok(Self {
            name,
            works: Vec::new(),
            project_path,
            template_path: None,
        })
    }

    /// Create a project directory from a workflow template and save it.
    ///
    /// The directory may already exist; its `workflow.yml` is (re)written.
    pub fn create(name: impl Into<String>, base_dir: &Path, template_path: &Path) -> Result<Self> {
        let mut project = Self::new(name, Some(base_dir))?;
        project.template_path = Some(template_path.to_path_buf());
        project.load_workflow_description(template_path)?;

        let project_path = project.require_project_path()?;
        std::fs::create_dir_all(project_path)?;
        project.save()?;

        log::info!(
            "Created project {} with {} works",
            project.name,
            project.works.len()
        );
        Ok(project)
    }

    /// Load an existing project from `<base_dir>/<name>/workflow.yml`.
    pub fn load(name: impl Into<String>, base_dir: &Path) -> Result<Self> {
        let mut project = Self::new(name, Some(base_dir))?;

        let project_path = project.require_project_path()?;
        if !project_path.exists() {
            return Err(Error::ProjectNotFound(project.name));
        }

        let project_file = project_path.join(PROJECT_FILE_NAME);
        project.load_project_from_file(&project_file)?;
        Ok(project)
    }

    /// Check whether `name` can be used as a project folder name.
    #[must_use]
    pub fn is_valid_folder_name(name: &str) -> bool {
        if name.trim().is_empty() {
            return false;
        }

        if name.contains(INVALID_NAME_CHARS) {
            return false;
        }

        if name.starts_with(['.', ' ']) || name.ends_with(['.', ' ']) {
            return false;
        }

        name.chars().count() <= MAX_NAME_LEN
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn works(&self) -> &[Work] {
        &self.works
    }

    #[must_use]
    pub fn project_path(&self) -> Option<&Path> {
        self.project_path.as_deref()
    }

    #[must_use]
    pub fn template_path(&self) -> Option<&Path> {
        self.template_path.as_deref()
    }

    /// Path of this project's `workflow.yml`, if it is attached to a directory.
    #[must_use]
    pub fn project_file(&self) -> Option<PathBuf> {
        self.project_path
            .as_ref()
            .map(|path| path.join(PROJECT_FILE_NAME))
    }

    fn require_project_path(&self) -> Result<&Path> {
        self.project_path
            .as_deref()
            .ok_or_else(|| Error::ProjectLoad(format!("project path is not set for {}", self.name)))
    }

    // -- Loading and saving ------------------------------------------------

    /// Load a saved project file, failing if it does not exist.
    pub fn load_project_from_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }

        log::info!("Loading project from {}", path.display());
        self.load_saved_project(path)?;
        log::info!("Loaded project {} from {}", self.name, path.display());
        Ok(())
    }

    /// Replace the works with those listed in a workflow template.
    ///
    /// Every work starts as `not_started`; the template's status values are
    /// required but not used.
    pub fn load_workflow_description(&mut self, template_path: &Path) -> Result<()> {
        let describe = |message: &str| {
            Error::WorkflowDescription(format!(
                "{message} in workflow description {}",
                template_path.display()
            ))
        };

        let document: RawDocument = load_yaml_file(template_path).map_err(|e| {
            Error::WorkflowFormat(format!(
                "failed to parse workflow description {}: {e}",
                template_path.display()
            ))
        })?;

        let workflow = document
            .workflow
            .ok_or_else(|| describe("missing workflow field"))?;
        let raw_works = workflow
            .works
            .ok_or_else(|| describe("missing works field"))?;

        let mut works = Vec::with_capacity(raw_works.len());
        for (position, raw) in raw_works.into_iter().enumerate() {
            let (work, _status) = raw.into_work(position + 1).map_err(|m| describe(&m))?;
            works.push(work);
        }

        self.works = works;
        Ok(())
    }

    /// Replace the name and works with those of a saved project file.
    pub fn load_saved_project(&mut self, path: &Path) -> Result<()> {
        let load_error = |message: &str| {
            Error::ProjectLoad(format!("{message} in project file {}", path.display()))
        };

        let document: RawDocument = load_yaml_file(path).map_err(|e| {
            Error::ProjectLoad(format!(
                "failed to parse project file {}: {e}",
                path.display()
            ))
        })?;

        let name = document.name.ok_or_else(|| load_error("missing name field"))?;
        let workflow = document
            .workflow
            .ok_or_else(|| load_error("missing workflow field"))?;
        let raw_works = workflow
            .works
            .ok_or_else(|| load_error("missing works field"))?;

        let mut works = Vec::with_capacity(raw_works.len());
        for (position, raw) in raw_works.into_iter().enumerate() {
            let (mut work, status) = raw.into_work(position + 1).map_err(|m| load_error(&m))?;
            let status = status
                .parse::<WorkStatus>()
                .map_err(|e| load_error(&e.to_string()))?;
            work.set_status(status);
            works.push(work);
        }

        self.name = name;
        self.works = works;
        Ok(())
    }

    /// Write the project document to `path`.
    pub fn save_project(&self, path: &Path) -> Result<()> {
        let document = SavedProject {
            name: &self.name,
            workflow: SavedWorkflow { works: &self.works },
        };

        save_yaml_file(path, &document).map_err(|e| {
            Error::ProjectSave(format!(
                "failed to save project file {}: {e}",
                path.display()
            ))
        })
    }

    /// Write `workflow.yml` into the project directory.
    ///
    /// Detached projects have nowhere to save to and are left alone.
    pub fn save(&self) -> Result<()> {
        match self.project_file() {
            Some(path) => self.save_project(&path),
            None => Ok(()),
        }
    }

    // -- Works -------------------------------------------------------------

    /// Find a work by name.
    ///
    /// With `without_check` the first work with that name is returned
    /// whatever its state. Otherwise the work is only returned when it is the
    /// next not-started work and its predecessor is done.
    #[must_use]
    pub fn get_work_by_name(&self, work_name: &str, without_check: bool) -> Option<&Work> {
        if without_check {
            return self.works.iter().find(|work| work.name == work_name);
        }

        match self.get_next_not_started_work() {
            NextWork::Ready(work) if work.name == work_name => Some(work),
            _ => None,
        }
    }

    /// Set the status of the named work and save the project.
    ///
    /// Returns `false` when the project has no work of that name.
    pub fn update_work_status(&mut self, work_name: &str, status: WorkStatus) -> Result<bool> {
        let Some(work) = self.works.iter_mut().find(|work| work.name == work_name) else {
            log::debug!("Project {} has no work named {}", self.name, work_name);
            return Ok(false);
        };

        work.set_status(status);
        log::info!("{}/{} is now {}", self.name, work_name, status);

        self.save()?;
        Ok(true)
    }

    /// The first work currently in progress.
    #[must_use]
    pub fn get_current_work(&self) -> Option<&Work> {
        self.works.iter().find(|work| work.is_in_progress())
    }

    /// The first not-started work and whether it can be picked up.
    #[must_use]
    pub fn get_next_not_started_work(&self) -> NextWork<'_> {
        let mut previous_done: Option<bool> = None;

        for work in &self.works {
            if work.is_not_started() {
                return match previous_done {
                    None | Some(true) => NextWork::Ready(work),
                    Some(false) => NextWork::Blocked(work),
                };
            }
            previous_done = Some(work.is_done());
        }

        log::debug!("No not-started work found in project {}", self.name);
        NextWork::Exhausted
    }

    #[must_use]
    pub fn is_all_done(&self) -> bool {
        self.works.iter().all(Work::is_done)
    }

    /// Number of works that are done.
    #[must_use]
    pub fn done_count(&self) -> usize {
        self.works.iter().filter(|work| work.is_done()).count()
    }

    // -- Files -------------------------------------------------------------

    /// Copy a file or directory into the project directory.
    ///
    /// Directories are copied recursively and merged into an existing
    /// directory of the same name. Returns the path of the copy.
    pub fn copy_to_project(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        let (source, target) = self.transfer_paths(source.as_ref())?;

        let copied = if source.is_file() {
            std::fs::copy(&source, &target).map(|_| ())
        } else if source.is_dir() {
            copy_dir_all(&source, &target)
        } else {
            return Err(Error::UnsupportedFileType(source));
        };

        copied.map_err(|e| {
            Error::ProjectSave(format!(
                "failed to copy {} to {}: {e}",
                source.display(),
                target.display()
            ))
        })?;

        log::debug!("Copied {} to {}", source.display(), target.display());
        Ok(target)
    }

    /// Move a file or directory into the project directory.
    ///
    /// An existing directory at the destination is replaced. Returns the
    /// new path.
    pub fn move_to_project(&self, source: impl AsRef<Path>) -> Result<PathBuf> {
        let (source, target) = self.transfer_paths(source.as_ref())?;

        let moved = if source.is_file() {
            move_path(&source, &target, |from, to| std::fs::copy(from, to).map(|_| ()))
        } else if source.is_dir() {
            remove_existing_dir(&target).and_then(|()| move_path(&source, &target, copy_dir_all))
        } else {
            return Err(Error::UnsupportedFileType(source));
        };

        moved.map_err(|e| {
            Error::ProjectSave(format!(
                "failed to move {} to {}: {e}",
                source.display(),
                target.display()
            ))
        })?;

        log::debug!("Moved {} to {}", source.display(), target.display());
        Ok(target)
    }

    /// Resolve the source and destination of a copy or move.
    fn transfer_paths(&self, source: &Path) -> Result<(PathBuf, PathBuf)> {
        let project_path = self.require_project_path()?;

        if !source.exists() {
            return Err(Error::FileNotFound(source.to_path_buf()));
        }

        // Canonical form gives "." and "dir/.." a usable file name.
        let source = source.canonicalize()?;
        let file_name = source
            .file_name()
            .ok_or_else(|| Error::UnsupportedFileType(source.clone()))?;

        std::fs::create_dir_all(project_path)?;
        let target = project_path.join(file_name);

        // Copying onto itself truncates the file and removing an existing
        // target would delete the source, so overlapping paths are refused.
        let resolved_target = project_path.canonicalize()?.join(file_name);
        if resolved_target.starts_with(&source) || source.starts_with(&resolved_target) {
            return Err(Error::ProjectSave(format!(
                "{} overlaps its destination {} in project {}",
                source.display(),
                target.display(),
                self.name
            )));
        }

        Ok((source, target))
    }
}

impl fmt::Display for Project {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Project:")?;
        writeln!(f, "    name={}", self.name)?;
        writeln!(f, "    workflow:")?;
        writeln!(f, "        works:")?;
        for work in &self.works {
            writeln!(f, "            {work}")?;
        }
        Ok(())
    }
}

fn validate_name(name: &str) -> Result<()> {
    if Project::is_valid_folder_name(name) {
        Ok(())
    } else {
        Err(Error::Configuration(format!(
            "invalid project name: {name:?}; project name must be a valid folder name"
        )))
    }
}

/// Recursively copy `source` into `target`, merging with existing content.
fn copy_dir_all(source: &Path, target: &Path) -> io::Result<()> {
    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(source).map_err(io::Error::other)?;
        let destination = target.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&destination)?;
        } else {
            std::fs::copy(entry.path(), &destination)?;
        }
    }
    Ok(())
}

fn remove_existing_dir(target: &Path) -> io::Result<()> {
    if target.is_dir() {
        std::fs::remove_dir_all(target)?;
    }
    Ok(())
}

/// Rename `source` to `target`, falling back to copy and delete when the
/// rename fails (for example across filesystems).
fn move_path(
    source: &Path,
    target: &Path,
    copy: impl Fn(&Path, &Path) -> io::Result<()>,
) -> io::Result<()> {
    match std::fs::rename(source, target) {
        Ok(()) => Ok(()),
        Err(e) => {
            log::debug!(
                "Rename of {} failed ({}), copying instead",
                source.display(),
                e
            );
            copy(source, target)?;
            if source.is_dir() {
                std::fs::remove_dir_all(source)
            } else {
                std::fs::remove_file(source)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project_with(statuses: &[WorkStatus]) -> Project {
        let mut project = Project::new("unit", None).unwrap();
        project.works = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                Work::new(i + 1, format!("work{}", i + 1), format!("w{}.md", i + 1), "")
                    .with_status(*status)
            })
            .collect();
        project
    }

    #[test]
    fn test_valid_folder_names() {
        assert!(Project::is_valid_folder_name("test_project"));
        assert!(Project::is_valid_folder_name("a"));
        assert!(Project::is_valid_folder_name("with space inside"));
        assert!(Project::is_valid_folder_name(&"x".repeat(255)));
    }

    #[test]
    fn test_invalid_folder_names() {
        for name in ["", "   ", "a/b", "a\\b", "a:b", "a*b", "a?b", "a<b", "a>b", "a|b", "a\"b"] {
            assert!(!Project::is_valid_folder_name(name), "{name:?} should be invalid");
        }
        for name in [".hidden", "trailing.", " leading", "trailing "] {
            assert!(!Project::is_valid_folder_name(name), "{name:?} should be invalid");
        }
        assert!(!Project::is_valid_folder_name(&"x".repeat(256)));
    }

    #[test]
    fn test_new_rejects_invalid_name() {
        let err = Project::new("bad/name", None).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_next_work_first_is_ready() {
        let project = project_with(&[WorkStatus::NotStarted, WorkStatus::NotStarted]);
        let next = project.get_next_not_started_work();
        assert!(next.is_ready());
        assert_eq!(next.work().unwrap().name, "work1");
    }

    #[test]
    fn test_next_work_after_done_is_ready() {
        let project = project_with(&[WorkStatus::Done, WorkStatus::NotStarted]);
        assert_eq!(
            project.get_next_not_started_work().work().map(|w| w.name.as_str()),
            Some("work2")
        );
        assert!(project.get_next_not_started_work().is_ready());
    }

    #[test]
    fn test_next_work_after_in_progress_is_blocked() {
        let project = project_with(&[WorkStatus::InProgress, WorkStatus::NotStarted]);
        let next = project.get_next_not_started_work();
        assert!(matches!(next, NextWork::Blocked(work) if work.name == "work2"));
    }

    #[test]
    fn test_next_work_only_checks_immediate_predecessor() {
        let project = project_with(&[
            WorkStatus::InProgress,
            WorkStatus::Done,
            WorkStatus::NotStarted,
        ]);
        assert!(matches!(
            project.get_next_not_started_work(),
            NextWork::Ready(work) if work.name == "work3"
        ));
    }

    #[test]
    fn test_next_work_exhausted() {
        let project = project_with(&[WorkStatus::Done, WorkStatus::InProgress]);
        assert_eq!(project.get_next_not_started_work(), NextWork::Exhausted);
        assert!(project.get_next_not_started_work().work().is_none());
    }

    #[test]
    fn test_get_work_by_name_checks_readiness() {
        let project = project_with(&[WorkStatus::InProgress, WorkStatus::NotStarted]);
        assert!(project.get_work_by_name("work2", false).is_none());
        assert!(project.get_work_by_name("work1", false).is_none());
        assert_eq!(project.get_work_by_name("work1", true).unwrap().index, 1);
        assert!(project.get_work_by_name("missing", true).is_none());
    }

    #[test]
    fn test_current_work_and_all_done() {
        let project = project_with(&[WorkStatus::Done, WorkStatus::InProgress]);
        assert_eq!(project.get_current_work().unwrap().name, "work2");
        assert!(!project.is_all_done());
        assert_eq!(project.done_count(), 1);

        let finished = project_with(&[WorkStatus::Done, WorkStatus::Done]);
        assert!(finished.is_all_done());
        assert!(finished.get_current_work().is_none());

        assert!(project_with(&[]).is_all_done());
    }

    #[test]
    fn test_update_unknown_work_is_ignored() {
        let mut project = project_with(&[WorkStatus::NotStarted]);
        let updated = project.update_work_status("missing", WorkStatus::Done).unwrap();
        assert!(!updated);
        assert!(project.works()[0].is_not_started());
    }

    #[test]
    fn test_update_detached_project_does_not_save() {
        let mut project = project_with(&[WorkStatus::NotStarted]);
        assert!(project.update_work_status("work1", WorkStatus::InProgress).unwrap());
        assert!(project.works()[0].is_in_progress());
        assert!(project.project_file().is_none());
    }

    #[test]
    fn test_display_lists_works() {
        let project = project_with(&[WorkStatus::Done, WorkStatus::NotStarted]);
        let display = project.to_string();
        assert!(display.starts_with("Project:"));
        assert!(display.contains("name=unit"));
        assert!(display.contains("name=work1"));
        assert!(display.contains("name=work2"));
    }
}
