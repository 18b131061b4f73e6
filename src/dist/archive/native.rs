//! Built-in zip writer used when the `zip` command is unavailable.

use crate::dist::error::{Error, ErrorExt, Result};
use std::{
    io,
    path::{Path, PathBuf},
};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// Writes `inputs` (relative to `root`) into a new archive at `archive`.
///
/// Directories are added recursively. Inputs that do not exist are skipped
/// with a warning, matching `zip`'s "name not matched" behaviour. Fails if
/// nothing at all could be added.
pub async fn write_archive(root: &Path, inputs: &[PathBuf], archive: &Path) -> Result<usize> {
    let root = root.to_path_buf();
    let inputs = inputs.to_vec();
    let archive = archive.to_path_buf();

    tokio::task::spawn_blocking(move || write_archive_blocking(&root, &inputs, &archive))
        .await
        .map_err(|e| Error::GenericError(format!("archive task panicked: {}", e)))?
}

fn entry_name(rel_path: &Path) -> String {
    rel_path.to_string_lossy().replace('\\', "/")
}

fn write_archive_blocking(root: &Path, inputs: &[PathBuf], archive: &Path) -> Result<usize> {
    let file = std::fs::File::create(archive).fs_context("creating archive", archive)?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut entries = 0;

    for input in inputs {
        let source = root.join(input);
        if !source.exists() {
            log::warn!("zip warning: name not matched: {}", input.display());
            continue;
        }

        for entry in walkdir::WalkDir::new(&source).sort_by_file_name() {
            let entry = entry?;
            // Never archive the archive itself.
            if entry.path() == archive {
                continue;
            }

            let rel_path = entry.path().strip_prefix(root)?;
            let name = entry_name(rel_path);

            if entry.file_type().is_dir() {
                writer.add_directory(format!("{name}/"), options)?;
            } else if entry.file_type().is_file() {
                writer.start_file(name, options)?;
                let mut source_file =
                    std::fs::File::open(entry.path()).fs_context("opening archive input", entry.path())?;
                io::copy(&mut source_file, &mut writer)
                    .fs_context("writing archive entry", entry.path())?;
            } else {
                log::debug!("Skipping {}: not a file or directory", entry.path().display());
                continue;
            }
            entries += 1;
        }
    }

    writer.finish()?;

    if entries == 0 {
        std::fs::remove_file(archive).fs_context("removing empty archive", archive)?;
        return Err(Error::GenericError(format!(
            "nothing to do: none of the archive inputs exist in {}",
            root.display()
        )));
    }

    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn archives_files_and_directories_recursively() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("README.md"), "# readme").unwrap();
        std::fs::create_dir_all(dir.path().join("dist/img")).unwrap();
        std::fs::write(dir.path().join("dist/jsoneditor.js"), "x").unwrap();
        std::fs::write(dir.path().join("dist/img/icons.svg"), "<svg/>").unwrap();

        let archive = dir.path().join("jsoneditor-5.2.0.zip");
        let inputs = vec![PathBuf::from("README.md"), PathBuf::from("dist"), PathBuf::from("docs")];
        write_archive(dir.path(), &inputs, &archive).await.unwrap();

        let mut zip = zip::ZipArchive::new(std::fs::File::open(&archive).unwrap()).unwrap();
        let names: Vec<String> = (0..zip.len())
            .map(|i| zip.by_index(i).unwrap().name().to_string())
            .collect();
        assert!(names.contains(&"README.md".to_string()));
        assert!(names.contains(&"dist/jsoneditor.js".to_string()));
        assert!(names.contains(&"dist/img/icons.svg".to_string()));
        assert!(!names.iter().any(|n| n.starts_with("docs")));
    }

    #[tokio::test]
    async fn nothing_to_archive_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("empty.zip");
        let result = write_archive(dir.path(), &[PathBuf::from("missing")], &archive).await;
        assert!(result.is_err());
        assert!(!archive.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn symlinks_are_not_counted_as_entries() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("dist")).unwrap();
        std::fs::write(dir.path().join("dist/jsoneditor.js"), "x").unwrap();
        std::os::unix::fs::symlink(
            dir.path().join("dist/jsoneditor.js"),
            dir.path().join("dist/latest.js"),
        )
        .unwrap();

        let archive = dir.path().join("jsoneditor-5.2.0.zip");
        let entries = write_archive(dir.path(), &[PathBuf::from("dist")], &archive)
            .await
            .unwrap();
        assert_eq!(entries, 2);

        let zip = zip::ZipArchive::new(std::fs::File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), entries);
    }
}
