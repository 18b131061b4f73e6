//! Command line argument parsing and validation.
//!
//! This module provides CLI argument parsing using clap. Task names are the
//! only positional arguments.

use clap::Parser;
use std::path::PathBuf;

/// Task runner for JavaScript library distributables
#[derive(Parser, Debug)]
#[command(
    name = "kodegen_bundler_dist",
    version,
    about = "Task runner for JavaScript library distributables",
    long_about = "Builds the full and minimalist bundles, watches sources and packages release archives.

Tasks:
  mkdir               create the output directory
  bundle              build the full bundle (after mkdir)
  bundle-minimalist   build the minimalist bundle (after mkdir)
  zip                 package docs, sources and bundles into <name>-<version>.zip
  watch               build, then rebuild the full bundle on every source change
  default             bundle + bundle-minimalist (run when no task is named)

Usage:
  kodegen_bundler_dist
  kodegen_bundler_dist bundle zip
  kodegen_bundler_dist --project-dir ../jsoneditor watch"
)]
pub struct Args {
    /// Tasks to run, with their dependencies
    #[arg(value_name = "TASK")]
    pub tasks: Vec<String>,

    /// Project directory containing package.json and the sources
    #[arg(
        short = 'C',
        long,
        value_name = "DIR",
        default_value = ".",
        env = "KODEGEN_DIST_PROJECT_DIR"
    )]
    pub project_dir: PathBuf,

    /// Print the task tree and exit
    #[arg(short, long)]
    pub list: bool,
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), String> {
        if let Some(empty) = self.tasks.iter().position(|t| t.trim().is_empty()) {
            return Err(format!("Task name at position {} is empty", empty + 1));
        }
        Ok(())
    }

    /// Requested task names, falling back to `default`.
    pub fn task_names(&self) -> Vec<&str> {
        if self.tasks.is_empty() {
            vec![crate::dist::tasks::DEFAULT]
        } else {
            self.tasks.iter().map(String::as_str).collect()
        }
    }
}
