//! Loading of `bundle.toml` overrides.

use super::{Project, ProjectConfig};
use crate::dist::error::{ErrorExt, Result};
use std::path::Path;

/// Name of the optional override file in the project directory.
pub const CONFIG_FILE_NAME: &str = "bundle.toml";

/// Loads the project configuration for `root`.
///
/// Missing `bundle.toml` yields the defaults; a present but malformed file is
/// an error.
pub fn load_project(root: &Path) -> Result<Project> {
    let config_path = root.join(CONFIG_FILE_NAME);

    let config = if config_path.is_file() {
        let raw = std::fs::read_to_string(&config_path)
            .fs_context("reading project config", &config_path)?;
        let config: ProjectConfig = toml::from_str(&raw)?;
        log::debug!("Loaded overrides from {}", config_path.display());
        config
    } else {
        log::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        ProjectConfig::default()
    };

    Ok(Project::new(root, config))
}
