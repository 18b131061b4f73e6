//! Banner generation.
//!
//! The banner is the license header injected at the top of each bundle. It
//! embeds the project version and today's date, so it is regenerated before
//! every build instead of being cached.

use crate::dist::{
    error::{ErrorExt, Result},
    metadata::load_package,
};
use chrono::{Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Placeholder replaced with the project version.
pub const VERSION_TOKEN: &str = "@@version";

/// Placeholder replaced with the build date.
pub const DATE_TOKEN: &str = "@@date";

/// Substitutes the first `@@date` and the first `@@version` in `template`.
pub fn render_banner(template: &str, version: &str, today: NaiveDate) -> String {
    let date = today.format("%Y-%m-%d").to_string();
    template
        .replacen(DATE_TOKEN, &date, 1)
        .replacen(VERSION_TOKEN, version, 1)
}

/// Reads the header template at `header` and renders it.
pub fn generate_banner(header: &Path, version: &str, today: NaiveDate) -> Result<String> {
    let template = std::fs::read_to_string(header).fs_context("reading banner header", header)?;
    Ok(render_banner(&template, version, today))
}

/// Where banner inputs live.
#[derive(Debug, Clone)]
pub struct BannerSource {
    header: PathBuf,
    package_json: PathBuf,
}

impl BannerSource {
    /// Creates a banner source from the header template and `package.json` paths.
    pub fn new(header: impl Into<PathBuf>, package_json: impl Into<PathBuf>) -> Self {
        Self {
            header: header.into(),
            package_json: package_json.into(),
        }
    }

    /// Renders the banner for today, re-reading the template and version.
    pub fn banner(&self) -> Result<String> {
        self.banner_on(Local::now().date_naive())
    }

    /// Renders the banner for a fixed date.
    pub fn banner_on(&self, today: NaiveDate) -> Result<String> {
        let version = load_package(&self.package_json)?.version;
        generate_banner(&self.header, &version, today)
    }
}
