//! Error types for distribution build operations.
//!
//! Provides the [`Error`] enum shared by every task, plus the [`Context`] and
//! [`ErrorExt`] helpers used to attach human readable context to failures.

use std::{fmt::Display, path::Path};

/// Result alias for distribution build operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while configuring, bundling, watching or packaging.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Generic error with a message.
    #[error("{0}")]
    GenericError(String),

    /// IO error.
    #[error("{0}")]
    IoError(#[from] std::io::Error),

    /// Filesystem operation failed on a specific path.
    #[error("{context} {}: {error}", .path.display())]
    Fs {
        /// What was being done.
        context: &'static str,
        /// Path involved.
        path: std::path::PathBuf,
        /// Underlying IO error.
        error: std::io::Error,
    },

    /// JSON parsing error (package.json, bundler stats).
    #[error("{0}")]
    JsonError(#[from] serde_json::Error),

    /// TOML parsing error (bundle.toml).
    #[error("{0}")]
    TomlError(#[from] toml::de::Error),

    /// Invalid rule or replacement pattern.
    #[error("{0}")]
    RegexError(#[from] regex::Error),

    /// Bundler configuration template error.
    #[error("{0}")]
    TemplateError(#[from] handlebars::RenderError),

    /// Native archive writer error.
    #[error("{0}")]
    ZipError(#[from] zip::result::ZipError),

    /// Directory traversal error.
    #[error("{0}")]
    WalkdirError(#[from] walkdir::Error),

    /// Path prefix stripping error.
    #[error("{0}")]
    StripPrefixError(#[from] std::path::StripPrefixError),

    /// Filesystem watcher error.
    #[error("{0}")]
    WatchError(#[from] notify::Error),

    /// Task graph definition or lookup error.
    #[error("task error: {0}")]
    Task(String),

    /// An external command exited unsuccessfully.
    #[error("`{command}` failed with {status}: {stderr}")]
    CommandFailed {
        /// The command line that was run.
        command: String,
        /// Exit status description.
        status: String,
        /// Captured standard error.
        stderr: String,
    },

    /// Required tool is not installed.
    #[error("`{0}` was not found in PATH")]
    ToolNotFound(String),
}

/// Attach a message to an `Option` or foreign `Result`.
pub trait Context<T> {
    /// Converts `None` or an error into [`Error::GenericError`] with the given message.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static;
}

impl<T> Context<T> for Option<T> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.ok_or_else(|| Error::GenericError(context.to_string()))
    }
}

impl<T, E: Display> Context<T> for std::result::Result<T, E> {
    fn context<C>(self, context: C) -> Result<T>
    where
        C: Display + Send + Sync + 'static,
    {
        self.map_err(|e| Error::GenericError(format!("{context}: {e}")))
    }
}

/// Extension for IO results that records which path was being touched.
pub trait ErrorExt<T> {
    /// Wraps an IO error into [`Error::Fs`].
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T>;
}

impl<T> ErrorExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, context: &'static str, path: impl AsRef<Path>) -> Result<T> {
        self.map_err(|error| Error::Fs {
            context,
            path: path.as_ref().to_path_buf(),
            error,
        })
    }
}

/// Return early with a [`Error::GenericError`] built from a format string.
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::dist::Error::GenericError(format!($($arg)*)))
    };
}
