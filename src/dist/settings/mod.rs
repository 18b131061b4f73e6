//! Configuration structures for distribution builds.
//!
//! [`ProjectConfig`] carries the project layout, [`Project`] anchors it to a
//! directory, and [`load_project`] reads optional `bundle.toml` overrides.

mod loader;
mod project;

pub use loader::{CONFIG_FILE_NAME, load_project};
pub use project::{Project, ProjectConfig};
