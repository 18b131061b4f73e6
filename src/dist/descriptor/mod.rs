//! Build descriptors for the full and minimalist bundles.
//!
//! A [`BuildDescriptor`] is everything the bundler needs for one output:
//! entry point, output target, transform rules and plugin chain. Two are
//! built per process by [`DescriptorSet::new`]; they are never rebuilt, only
//! their banner text is refreshed before each run.
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_dist::dist::{DescriptorSet, Project, ProjectConfig};
//!
//! # fn example() -> kodegen_bundler_dist::dist::Result<()> {
//! let project = Project::new(".", ProjectConfig::default());
//! let set = DescriptorSet::new(&project, "/* banner */")?;
//! assert_eq!(set.minimalist.module_replacements().count(), 3);
//! # Ok(())
//! # }
//! ```

mod plugins;
mod rules;

pub use plugins::Plugin;
pub use rules::{RuleUse, TransformRule, standard_rules};

use crate::dist::{error::Result, settings::Project};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Module requests stubbed out of the minimalist bundle: the code editor,
/// the schema validator and the JSON linter.
pub const MINIMALIST_EXCLUSIONS: [&str; 3] = ["^brace$", "^ajv", "jsonlint$"];

/// Module wrapper the bundle is emitted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryTarget {
    /// AMD, CommonJS and global variable in one wrapper.
    Umd,
}

/// Which bundle a descriptor produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Every feature included.
    Full,
    /// Optional dependencies replaced with an empty module.
    Minimalist,
}

impl Variant {
    /// Short label used for cache names and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Variant::Full => "full",
            Variant::Minimalist => "minimalist",
        }
    }
}

/// Immutable description of one bundler run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildDescriptor {
    variant: Variant,
    entry: PathBuf,
    output_dir: PathBuf,
    output_filename: String,
    library_name: String,
    library_target: LibraryTarget,
    devtool: &'static str,
    rules: Vec<TransformRule>,
    plugins: Vec<Plugin>,
    cache: bool,
    bail: bool,
}

impl BuildDescriptor {
    /// Which bundle this describes.
    pub fn variant(&self) -> Variant {
        self.variant
    }

    /// Entry module path.
    pub fn entry(&self) -> &Path {
        &self.entry
    }

    /// Output directory.
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Bundle file name.
    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    /// Source map file name.
    pub fn source_map_filename(&self) -> String {
        format!("{}.map", self.output_filename)
    }

    /// Full path of the emitted bundle.
    pub fn output_path(&self) -> PathBuf {
        self.output_dir.join(&self.output_filename)
    }

    /// Exported library symbol.
    pub fn library_name(&self) -> &str {
        &self.library_name
    }

    /// Module wrapper.
    pub fn library_target(&self) -> LibraryTarget {
        self.library_target
    }

    /// Source map style.
    pub fn devtool(&self) -> &str {
        self.devtool
    }

    /// Transform rules in evaluation order.
    pub fn rules(&self) -> &[TransformRule] {
        &self.rules
    }

    /// Plugin chain in application order.
    pub fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Module replacement plugins only.
    pub fn module_replacements(&self) -> impl Iterator<Item = &Plugin> {
        self.plugins.iter().filter(|p| p.is_module_replacement())
    }

    /// Whether the bundler should keep its cache between runs.
    pub fn cache(&self) -> bool {
        self.cache
    }

    /// Whether the bundler stops at the first error.
    pub fn bail(&self) -> bool {
        self.bail
    }

    /// Current banner text, if the chain has a banner plugin.
    pub fn banner(&self) -> Option<&str> {
        self.plugins.iter().find_map(|p| match p {
            Plugin::Banner { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Replaces the banner text. This is the only mutation a descriptor allows.
    pub fn refresh_banner(&mut self, banner: String) {
        for plugin in &mut self.plugins {
            if let Plugin::Banner { text, .. } = plugin {
                *text = banner;
                return;
            }
        }
    }
}

/// The two descriptors built at process start.
#[derive(Debug, Clone)]
pub struct DescriptorSet {
    /// Full bundle.
    pub full: BuildDescriptor,
    /// Minimalist bundle.
    pub minimalist: BuildDescriptor,
}

impl DescriptorSet {
    /// Builds both descriptors for `project` with an initial banner.
    ///
    /// Performs no I/O.
    pub fn new(project: &Project, banner: &str) -> Result<Self> {
        let config = project.config();
        let rules = standard_rules()?;

        let base = |variant: Variant, name: &str, plugins: Vec<Plugin>| BuildDescriptor {
            variant,
            entry: project.resolve(&config.entry),
            output_dir: project.dist_dir(),
            output_filename: format!("{name}.js"),
            library_name: config.library.clone(),
            library_target: LibraryTarget::Umd,
            devtool: "source-map",
            rules: rules.clone(),
            plugins,
            cache: true,
            bail: variant == Variant::Full,
        };

        let full = base(
            Variant::Full,
            &config.name,
            vec![Plugin::banner(banner), Plugin::Minify],
        );

        let empty = project.empty_module_path();
        let mut minimalist_plugins = vec![Plugin::banner(banner)];
        for pattern in MINIMALIST_EXCLUSIONS {
            minimalist_plugins.push(Plugin::module_replacement(pattern, &empty)?);
        }
        minimalist_plugins.push(Plugin::Minify);

        let minimalist = base(
            Variant::Minimalist,
            &config.minimalist_name,
            minimalist_plugins,
        );

        Ok(Self { full, minimalist })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::settings::ProjectConfig;

    fn set() -> DescriptorSet {
        let project = Project::new("/project", ProjectConfig::default());
        DescriptorSet::new(&project, "/* banner */").unwrap()
    }

    #[test]
    fn minimalist_has_three_replacements_full_has_none() {
        let set = set();
        assert_eq!(set.full.module_replacements().count(), 0);

        let replacements: Vec<_> = set.minimalist.module_replacements().collect();
        assert_eq!(replacements.len(), 3);
        assert!(replacements.iter().any(|p| p.replaces("brace")));
        assert!(replacements.iter().any(|p| p.replaces("ajv")));
        assert!(replacements.iter().any(|p| p.replaces("jsonlint")));
        for plugin in replacements {
            match plugin {
                Plugin::ModuleReplacement { replacement, .. } => {
                    assert_eq!(replacement, Path::new("/project/src/utils/empty.js"))
                }
                other => panic!("unexpected plugin {other:?}"),
            }
        }
    }

    #[test]
    fn banner_comes_first_and_minify_last() {
        let set = set();
        for descriptor in [&set.full, &set.minimalist] {
            assert!(matches!(descriptor.plugins().first(), Some(Plugin::Banner { .. })));
            assert_eq!(descriptor.plugins().last(), Some(&Plugin::Minify));
        }
    }

    #[test]
    fn variants_share_directory_but_not_filename() {
        let set = set();
        assert_eq!(set.full.output_dir(), set.minimalist.output_dir());
        assert_eq!(set.full.output_filename(), "jsoneditor.js");
        assert_eq!(set.minimalist.output_filename(), "jsoneditor-minimalist.js");
        assert_eq!(set.full.source_map_filename(), "jsoneditor.js.map");
        assert_eq!(set.full.library_name(), "jsoneditor");
        assert_eq!(set.minimalist.library_target(), LibraryTarget::Umd);
        assert_eq!(set.full.rules().len(), set.minimalist.rules().len());
    }

    #[test]
    fn refresh_banner_only_touches_banner() {
        let mut set = set();
        let before = set.full.plugins().len();
        set.full.refresh_banner("/* new */".into());
        assert_eq!(set.full.banner(), Some("/* new */"));
        assert_eq!(set.full.plugins().len(), before);
        assert_eq!(set.minimalist.banner(), Some("/* banner */"));
    }
}
