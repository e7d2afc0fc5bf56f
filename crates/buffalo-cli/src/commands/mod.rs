use anyhow::{Context as _, Result};
use buffalo_core::{template, Buffalo, Config};
use std::path::PathBuf;

pub mod config;
pub mod files;
pub mod project;
pub mod work;

pub use files::{copy_into, move_into};
pub use project::{create_project, list_projects, show_next, show_project};
pub use work::{find_job, set_status};

/// Command-line overrides shared by every command.
#[derive(Debug)]
pub struct Context {
    base_dir: Option<PathBuf>,
    template: Option<PathBuf>,
}

impl Context {
    pub fn new(base_dir: Option<PathBuf>, template: Option<PathBuf>) -> Self {
        Self { base_dir, template }
    }

    /// Effective configuration: CLI overrides on top of env and config file.
    pub fn config(&self) -> Result<Config> {
        Ok(Config::load()?.with_overrides(self.base_dir.clone(), self.template.clone()))
    }

    /// Open the project manager for the configured base directory.
    pub fn open(&self) -> Result<Buffalo> {
        let config = self.config()?;
        let template_path = template::resolve_template(
            self.template.as_deref(),
            config.template_path.as_deref(),
            &config.base_dir,
        )
        .context("Failed to prepare the workflow template")?;

        log::debug!(
            "Opening projects in {} with template {}",
            config.base_dir.display(),
            template_path.display()
        );

        Buffalo::new(&config.base_dir, &template_path).with_context(|| {
            format!("Failed to open projects in {}", config.base_dir.display())
        })
    }
}

/// Print the bundled workflow template.
pub fn show_template() {
    print!("{}", template::default_template());
}
