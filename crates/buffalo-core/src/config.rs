use anyhow::{Context, Result};
use confyg::{env, Confygery};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Keys accepted by `buffalo config get` and `buffalo config set`.
pub const CONFIG_KEYS: &[&str] = &["base_dir", "template_path"];

/// Configuration for buffalo.
///
/// Configuration is loaded from multiple sources with the following priority:
/// 1. CLI arguments (highest priority)
/// 2. Environment variables (BUFFALO_* prefix)
/// 3. Config file (~/.config/buffalo/config.toml)
/// 4. Built-in defaults (lowest priority)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding one sub-directory per project.
    ///
    /// Can be set via:
    /// - CLI: --base-dir /path/to/projects
    /// - ENV: BUFFALO_BASE_DIR
    /// - Config: base_dir = "/path/to/projects"
    /// - Default: ~/.local/share/buffalo/projects
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,

    /// Workflow template used for new projects.
    ///
    /// Can be set via:
    /// - CLI: --template /path/to/wf_template.yml
    /// - ENV: BUFFALO_TEMPLATE_PATH
    /// - Config: template_path = "/path/to/wf_template.yml"
    /// - Default: the bundled template, written to the base directory
    #[serde(default)]
    pub template_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
            template_path: None,
        }
    }
}

impl Config {
    /// Load configuration from file and environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed.
    pub fn load() -> Result<Self> {
        let config_path = config_file_path();

        let mut builder = Confygery::new().context("Failed to create config builder")?;

        if config_path.exists() {
            let path_str = config_path
                .to_str()
                .ok_or_else(|| anyhow::anyhow!("Config path contains invalid UTF-8"))?;
            builder
                .add_file(path_str)
                .context("Failed to load config file")?;
        }

        let env_opts = env::Options::with_top_level("buffalo");
        builder
            .add_env(env_opts)
            .context("Failed to load environment variables")?;

        let config: Self = builder.build().context("Failed to build configuration")?;

        log::debug!("Loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Apply command-line overrides on top of the loaded configuration.
    #[must_use]
    pub fn with_overrides(mut self, base_dir: Option<PathBuf>, template_path: Option<PathBuf>) -> Self {
        if let Some(base_dir) = base_dir {
            self.base_dir = base_dir;
        }
        if template_path.is_some() {
            self.template_path = template_path;
        }
        self
    }

    /// Look up a value by its config key.
    pub fn get(&self, key: &str) -> Result<String> {
        match key {
            "base_dir" => Ok(self.base_dir.display().to_string()),
            "template_path" => Ok(self
                .template_path
                .as_ref()
                .map_or_else(|| String::from("<not set>"), |p| p.display().to_string())),
            _ => anyhow::bail!(
                "Unknown config key: {}\n\nValid keys: {}",
                key,
                CONFIG_KEYS.join(", ")
            ),
        }
    }
}

/// Get the default project base directory.
///
/// Returns: ~/.local/share/buffalo/projects (or platform equivalent)
fn default_base_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("buffalo")
        .join("projects")
}

/// Get the config file path.
///
/// Returns:
/// - Linux: ~/.config/buffalo/config.toml
/// - macOS: ~/Library/Application Support/buffalo/config.toml
/// - Windows: %APPDATA%\buffalo\config.toml
pub fn config_file_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("buffalo")
        .join("config.toml")
}

/// Get the example config file content.
pub fn example_config() -> &'static str {
    r#"# Buffalo Configuration File
#
# Configuration is loaded from multiple sources with the following priority:
# 1. CLI arguments (highest priority)
# 2. Environment variables (BUFFALO_* prefix)
# 3. This config file
# 4. Built-in defaults (lowest priority)

# Directory holding one sub-directory per project
#
# Can also be set via:
# - CLI: buffalo --base-dir /custom/projects list
# - Environment: BUFFALO_BASE_DIR=/custom/projects
#
# Default: Platform-specific data directory
#base_dir = "/path/to/projects"

# Workflow template used when creating projects
#
# Can also be set via:
# - CLI: buffalo --template my_workflow.yml create my_project
# - Environment: BUFFALO_TEMPLATE_PATH=/path/to/wf_template.yml
#
# Default: the bundled template (see `buffalo template`)
#template_path = "/path/to/wf_template.yml"
"#
}

/// Create default config file if it doesn't exist.
///
/// Returns true if a new file was created, false if it already existed.
pub fn ensure_config_file() -> Result<bool> {
    let config_path = config_file_path();

    if config_path.exists() {
        return Ok(false);
    }

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent).context("Failed to create config directory")?;
    }

    std::fs::write(&config_path, example_config()).context("Failed to write config file")?;

    Ok(true)
}

/// Replace (or add) the top-level `key = "value"` in the contents of a
/// config file.
///
/// Commented-out lines and keys inside tables are left alone; a new key is
/// inserted before the first table header. The result must still be valid
/// TOML.
pub fn set_value(contents: &str, key: &str, value: &str) -> Result<String> {
    if !CONFIG_KEYS.contains(&key) {
        anyhow::bail!(
            "Unknown config key: {}\n\nValid keys: {}",
            key,
            CONFIG_KEYS.join(", ")
        );
    }

    let entry = format!("{} = {}", key, toml::Value::String(value.to_string()));
    let mut lines: Vec<String> = contents.lines().map(str::to_string).collect();

    // Top-level keys must come before the first table header.
    let first_table = lines
        .iter()
        .position(|line| line.trim_start().starts_with('['))
        .unwrap_or(lines.len());

    let existing = lines[..first_table].iter().position(|line| {
        line.trim_start()
            .strip_prefix(key)
            .is_some_and(|rest| rest.trim_start().starts_with('='))
    });

    match existing {
        Some(index) => lines[index] = entry,
        None => lines.insert(first_table, entry),
    }

    let mut updated = lines.join("\n");
    updated.push('\n');

    updated
        .parse::<toml::Table>()
        .with_context(|| format!("Setting {} would produce an invalid config file", key))?;

    Ok(updated)
}
