//! Distribution archive packaging.
//!
//! The `zip` task shells out to the system `zip` command. When it is not
//! installed, the archive is written with the built-in writer instead.
//!
//! - [`checksum`] - SHA-256 of the produced archive
//! - [`native`] - built-in zip writer
//! - [`tool_detection`] - `zip` command lookup

mod checksum;
mod native;
mod tool_detection;

pub use checksum::calculate_sha256;
pub use native::write_archive;
pub use tool_detection::ZIP_COMMAND;

use crate::dist::{
    error::{Error, ErrorExt, Result},
    metadata::load_package,
    settings::Project,
};
use std::{
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;

/// How an archive was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveMethod {
    /// The system `zip` command.
    External,
    /// The built-in writer.
    Native,
}

/// A finished archive.
#[derive(Debug, Clone)]
pub struct PackagedArchive {
    /// Archive location.
    pub path: PathBuf,
    /// Size in bytes.
    pub size: u64,
    /// Hex SHA-256.
    pub checksum: String,
    /// How it was produced.
    pub method: ArchiveMethod,
}

/// Packages the project's archive inputs into `<name>-<version>.zip`.
///
/// The system `zip` is looked up on the first [`Archiver::package`] call, so
/// processes that never package never probe for it.
#[derive(Debug, Clone)]
pub struct Archiver {
    project: Project,
    zip_override: Option<Option<PathBuf>>,
}

impl Archiver {
    /// Archiver for `project`, using the system `zip` when available.
    pub fn new(project: &Project) -> Self {
        Self {
            project: project.clone(),
            zip_override: None,
        }
    }

    /// Overrides the archiver command; `None` forces the built-in writer.
    pub fn with_zip_command(mut self, command: Option<PathBuf>) -> Self {
        self.zip_override = Some(command);
        self
    }

    /// The `zip` executable to run, or `None` for the built-in writer.
    pub fn zip_command(&self) -> Option<&Path> {
        match &self.zip_override {
            Some(command) => command.as_deref(),
            None => ZIP_COMMAND.as_deref(),
        }
    }

    /// Archive path for the current project version.
    pub fn archive_path(&self) -> Result<PathBuf> {
        let version = load_package(&self.project.package_json_path())?.version;
        Ok(self.project.root().join(self.project.archive_name(&version)))
    }

    fn inputs(&self) -> &[PathBuf] {
        &self.project.config().archive_inputs
    }

    /// Builds the archive and reports its size and checksum.
    pub async fn package(&self) -> Result<PackagedArchive> {
        let archive = self.archive_path()?;

        let method = match self.zip_command() {
            Some(zip) => {
                self.run_zip(zip, &archive).await?;
                ArchiveMethod::External
            }
            None => {
                let entries = write_archive(self.project.root(), self.inputs(), &archive).await?;
                log::debug!("Wrote {} entries with the built-in archiver", entries);
                ArchiveMethod::Native
            }
        };

        let size = tokio::fs::metadata(&archive)
            .await
            .fs_context("reading archive metadata", &archive)?
            .len();
        let checksum = calculate_sha256(&archive).await?;

        log::info!("Packaged {} ({} bytes)", archive.display(), size);
        log::info!("SHA256: {}", checksum);

        Ok(PackagedArchive {
            path: archive,
            size,
            checksum,
            method,
        })
    }

    async fn run_zip(&self, zip: &Path, archive: &Path) -> Result<()> {
        let mut args = vec!["-r".to_string(), archive.to_string_lossy().into_owned()];
        args.extend(self.inputs().iter().map(|p| p.to_string_lossy().into_owned()));
        let command = format!("{} {}", zip.display(), args.join(" "));
        log::debug!("Running {}", command);

        let output = Command::new(zip)
            .args(&args)
            .current_dir(self.project.root())
            .stdin(Stdio::null())
            .output()
            .await
            .fs_context("spawning zip", zip)?;

        for line in String::from_utf8_lossy(&output.stdout).lines() {
            log::debug!("{}", line);
        }

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::settings::ProjectConfig;

    fn project(dir: &Path) -> Project {
        std::fs::write(dir.join("package.json"), r#"{"version":"5.2.0"}"#).unwrap();
        std::fs::write(dir.join("README.md"), "# jsoneditor").unwrap();
        std::fs::write(dir.join("LICENSE"), "Apache-2.0").unwrap();
        Project::new(dir, ProjectConfig::default())
    }

    #[tokio::test]
    async fn native_fallback_produces_version_stamped_archive() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = Archiver::new(&project(dir.path())).with_zip_command(None);

        let packaged = archiver.package().await.unwrap();
        assert_eq!(packaged.path, dir.path().join("jsoneditor-5.2.0.zip"));
        assert_eq!(packaged.method, ArchiveMethod::Native);
        assert!(packaged.size > 0);
        assert_eq!(packaged.checksum.len(), 64);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_command_fails_the_package() {
        let dir = tempfile::tempdir().unwrap();
        let archiver =
            Archiver::new(&project(dir.path())).with_zip_command(Some(PathBuf::from("false")));

        let err = archiver.package().await.unwrap_err();
        assert!(matches!(err, Error::CommandFailed { .. }));
    }

    #[test]
    fn zip_lookup_is_deferred_until_packaging() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = Archiver::new(&project(dir.path()));
        assert!(archiver.zip_override.is_none());

        let forced = archiver.clone().with_zip_command(None);
        assert_eq!(forced.zip_command(), None);

        let custom = archiver.with_zip_command(Some(PathBuf::from("/opt/bin/zip")));
        assert_eq!(custom.zip_command(), Some(Path::new("/opt/bin/zip")));
    }

    #[tokio::test]
    async fn missing_metadata_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let archiver = Archiver::new(&Project::new(dir.path(), ProjectConfig::default()))
            .with_zip_command(None);
        assert!(archiver.package().await.is_err());
    }
}
