//! Distribution task runner for JavaScript libraries
//!
//! This library provides the tasks that turn a library's sources into
//! release artifacts:
//! - full and minimalist bundles with source maps (via webpack)
//! - a watch mode that rebuilds on every source change
//! - a version-stamped zip archive
//!
//! It can be used both as a CLI tool and as a library dependency.

pub mod cli;
pub mod dist;
pub mod error;

// Re-export commonly used types
pub use error::{BundlerError, CliError, Result};
