//! External archiver detection.

use std::{path::PathBuf, sync::LazyLock};

/// Path to a working `zip` executable, if one is installed.
///
/// Cached to avoid repeated subprocess calls when packaging more than once.
pub static ZIP_COMMAND: LazyLock<Option<PathBuf>> = LazyLock::new(|| match which::which("zip") {
    Ok(path) => {
        log::debug!("Found zip at: {}", path.display());

        match std::process::Command::new(&path).arg("-v").output() {
            Ok(output) if output.status.success() => {
                let version = String::from_utf8_lossy(&output.stdout);
                let first_line = version.lines().nth(1).unwrap_or_default();
                log::debug!("zip available: {}", first_line.trim());
                Some(path)
            }
            Ok(output) => {
                log::warn!(
                    "zip found at {} but -v check failed (exit code: {:?}). \
                         Falling back to the built-in archiver.",
                    path.display(),
                    output.status.code()
                );
                None
            }
            Err(e) => {
                log::warn!(
                    "zip found at {} but failed to execute: {}. \
                         Falling back to the built-in archiver.",
                    path.display(),
                    e
                );
                None
            }
        }
    }
    Err(e) => {
        log::debug!("zip not found in PATH: {}. Using the built-in archiver.", e);
        None
    }
});
