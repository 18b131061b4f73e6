//! Top-level error types.
//!
//! [`BundlerError`] wraps everything the binary can fail with; build
//! failures come through as [`crate::dist::Error`].

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, BundlerError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum BundlerError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Build, watch or packaging errors
    #[error("{0}")]
    Dist(#[from] crate::dist::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },

    /// Task named on the command line is not defined
    #[error("Task '{task}' is not in your task list (available: {available})")]
    UnknownTask {
        /// Requested task
        task: String,
        /// Comma separated list of defined tasks
        available: String,
    },
}
