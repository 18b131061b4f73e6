//! Project layout configuration.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Layout and naming of the library being distributed.
///
/// Defaults describe the `jsoneditor` project. Any field can be overridden
/// from a `bundle.toml` file in the project directory. The modules stubbed
/// out of the minimalist bundle are fixed and not part of this surface
/// (see [`MINIMALIST_EXCLUSIONS`](crate::dist::descriptor::MINIMALIST_EXCLUSIONS)).
///
/// ```toml
/// name = "jsoneditor"
/// entry = "./src/index.js"
/// dist = "./dist"
/// archive_inputs = ["README.md", "LICENSE", "src", "dist"]
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Base name of the full bundle (`<name>.js`) and of the archive.
    pub name: String,

    /// Base name of the minimalist bundle.
    pub minimalist_name: String,

    /// Symbol the UMD wrapper exposes.
    pub library: String,

    /// Bundle entry point, relative to the project directory.
    pub entry: PathBuf,

    /// Banner template containing `@@version` and `@@date`.
    pub header: PathBuf,

    /// Output directory for bundles and source maps.
    pub dist: PathBuf,

    /// Empty module substituted for optional dependencies in the minimalist bundle.
    pub empty_module: PathBuf,

    /// Directory watched in watch mode.
    pub source_dir: PathBuf,

    /// Project metadata file holding the version.
    pub package_json: PathBuf,

    /// Paths packaged by the `zip` task.
    pub archive_inputs: Vec<PathBuf>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "jsoneditor".into(),
            minimalist_name: "jsoneditor-minimalist".into(),
            library: "jsoneditor".into(),
            entry: "./src/index.js".into(),
            header: "./src/header.js".into(),
            dist: "./dist".into(),
            empty_module: "src/utils/empty.js".into(),
            source_dir: "src".into(),
            package_json: "package.json".into(),
            archive_inputs: [
                "README.md",
                "LICENSE",
                "HISTORY.md",
                "index.html",
                "src",
                "dist",
                "docs",
                "examples",
            ]
            .into_iter()
            .map(PathBuf::from)
            .collect(),
        }
    }
}

/// A [`ProjectConfig`] anchored to a project directory.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config: ProjectConfig,
}

impl Project {
    /// Anchors a configuration to `root`.
    pub fn new(root: impl Into<PathBuf>, config: ProjectConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    /// Project directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Underlying configuration.
    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    /// Resolves a configured path against the project directory.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }

    /// Absolute output directory.
    pub fn dist_dir(&self) -> PathBuf {
        self.resolve(&self.config.dist)
    }

    /// Absolute banner template path.
    pub fn header_path(&self) -> PathBuf {
        self.resolve(&self.config.header)
    }

    /// Absolute project metadata path.
    pub fn package_json_path(&self) -> PathBuf {
        self.resolve(&self.config.package_json)
    }

    /// Absolute watched source directory.
    pub fn source_dir(&self) -> PathBuf {
        self.resolve(&self.config.source_dir)
    }

    /// Absolute empty stub module path.
    pub fn empty_module_path(&self) -> PathBuf {
        self.resolve(&self.config.empty_module)
    }

    /// Directory holding rendered bundler configs and the bundler cache.
    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(".cache").join("kodegen-dist")
    }

    /// Archive file name for the given version, e.g. `jsoneditor-5.2.0.zip`.
    pub fn archive_name(&self, version: &str) -> String {
        format!("{}-{}.zip", self.config.name, version)
    }
}
