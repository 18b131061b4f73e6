//! Project metadata from `package.json`.

use crate::dist::error::{Context, ErrorExt, Result};
use serde::Deserialize;
use std::path::Path;

/// The subset of `package.json` the build needs.
#[derive(Debug, Clone, Deserialize)]
pub struct PackageMetadata {
    /// Package name.
    #[serde(default)]
    pub name: Option<String>,

    /// Package version (e.g., "5.2.0").
    pub version: String,

    /// SPDX license identifier.
    #[serde(default)]
    pub license: Option<String>,

    /// Homepage URL.
    #[serde(default)]
    pub homepage: Option<String>,
}

/// Reads and parses `package.json`.
///
/// The file is read on every call so long-running watch sessions pick up
/// version bumps.
pub fn load_package(path: &Path) -> Result<PackageMetadata> {
    let raw = std::fs::read_to_string(path).fs_context("reading project metadata", path)?;
    let metadata: PackageMetadata = serde_json::from_str(&raw)
        .context(format!("failed to parse {}", path.display()))?;

    if metadata.version.trim().is_empty() {
        crate::bail!("empty 'version' in {}", path.display());
    }

    Ok(metadata)
}
