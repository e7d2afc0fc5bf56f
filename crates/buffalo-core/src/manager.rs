use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::model::{Work, WorkStatus};
use crate::project::{Project, PROJECT_FILE_NAME};

/// Manages every project under one base directory.
///
/// Projects are keyed by their folder name and iterated in name order, so
/// job lookup across projects is deterministic.
#[derive(Debug)]
pub struct Buffalo {
    base_dir: PathBuf,
    template_path: PathBuf,
    projects: BTreeMap<String, Project>,
}

impl Buffalo {
    /// Open the base directory (creating it if needed) and load every
    /// project already stored there.
    pub fn new(base_dir: impl Into<PathBuf>, template_path: impl Into<PathBuf>) -> Result<Self> {
        let base_dir = base_dir.into();
        let template_path = template_path.into();

        if !template_path.exists() {
            return Err(Error::FileNotFound(template_path));
        }

        std::fs::create_dir_all(&base_dir)?;

        let mut buffalo = Self {
            base_dir,
            template_path,
            projects: BTreeMap::new(),
        };
        let loaded = buffalo.load_projects()?;
        log::debug!(
            "Loaded {} projects from {}",
            loaded,
            buffalo.base_dir.display()
        );
        Ok(buffalo)
    }

    #[must_use]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    #[must_use]
    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    #[must_use]
    pub const fn projects(&self) -> &BTreeMap<String, Project> {
        &self.projects
    }

    #[must_use]
    pub fn project(&self, name: &str) -> Option<&Project> {
        self.projects.get(name)
    }

    pub fn project_names(&self) -> impl Iterator<Item = &str> {
        self.projects.keys().map(String::as_str)
    }

    /// Create a project from the template, or return the existing one.
    ///
    /// A project is reused when it is already loaded or when its
    /// `workflow.yml` exists on disk. A bare directory of the same name is
    /// turned into a project.
    pub fn create_project(&mut self, name: &str) -> Result<&Project> {
        if self.projects.contains_key(name) {
            log::warn!("Project {} already exists, reusing it", name);
        } else if self.base_dir.join(name).join(PROJECT_FILE_NAME).exists() {
            log::warn!("Project {} already exists on disk, loading it", name);
            let project = Project::load(name, &self.base_dir)?;
            self.projects.insert(name.to_string(), project);
        } else {
            let project = Project::create(name, &self.base_dir, &self.template_path)?;
            self.projects.insert(name.to_string(), project);
        }

        self.projects
            .get(name)
            .ok_or_else(|| Error::ProjectNotFound(name.to_string()))
    }

    /// Load a project from disk and register it.
    ///
    /// Returns `None` when the project cannot be loaded; the reason is logged.
    pub fn load_project(&mut self, name: &str) -> Option<&Project> {
        match Project::load(name, &self.base_dir) {
            Ok(project) => {
                self.projects.insert(name.to_string(), project);
                self.projects.get(name)
            }
            Err(e) => {
                log::error!("Failed to load project {}: {}", name, e);
                None
            }
        }
    }

    /// Scan the base directory and load every project in it.
    ///
    /// Previously loaded projects are dropped first, so projects removed
    /// from disk disappear. Returns the number of projects loaded.
    /// Directories without a `workflow.yml` are ignored and broken projects
    /// are skipped.
    pub fn load_projects(&mut self) -> Result<usize> {
        self.projects.clear();
        let mut count = 0;

        for entry in std::fs::read_dir(&self.base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() || !path.join(PROJECT_FILE_NAME).is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                log::warn!("Skipping project with non UTF-8 name: {}", path.display());
                continue;
            };

            if self.load_project(name).is_some() {
                count += 1;
            }
        }

        Ok(count)
    }

    /// Find a job named `work_name` in the first project that offers it.
    ///
    /// Returns the project folder name and the work. Unless `without_check`
    /// is set, only works that are ready to be picked up are returned.
    #[must_use]
    pub fn get_a_job(&self, work_name: &str, without_check: bool) -> Option<(&str, &Work)> {
        self.projects.iter().find_map(|(folder, project)| {
            project
                .get_work_by_name(work_name, without_check)
                .map(|work| (folder.as_str(), work))
        })
    }

    /// Update the status of a work and save its project.
    ///
    /// Returns `false` when the project has no such work.
    pub fn update_work_status(
        &mut self,
        project_name: &str,
        work_name: &str,
        status: WorkStatus,
    ) -> Result<bool> {
        let project = self
            .projects
            .get_mut(project_name)
            .ok_or_else(|| Error::ProjectNotFound(project_name.to_string()))?;
        project.update_work_status(work_name, status)
    }
}
