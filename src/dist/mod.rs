//! Distribution build core.
//!
//! Builds the full and minimalist bundles of a JavaScript library through an
//! external bundler, rebuilds on source changes and packages release
//! archives.
//!
//! # Overview
//!
//! 1. [`load_project`] reads the layout ([`ProjectConfig`] defaults plus
//!    `bundle.toml` overrides)
//! 2. [`BuildContext::new`] renders the banner and builds both
//!    [`BuildDescriptor`]s, each wrapped in a long-lived [`Builder`]
//! 3. [`standard_graph`] registers the tasks
//! 4. [`TaskGraph::run_all`] runs the requested tasks and their dependencies
//!
//! # Example
//!
//! ```no_run
//! use kodegen_bundler_dist::dist::{
//!     BuildContext, WebpackCompiler, load_project, standard_graph,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> kodegen_bundler_dist::dist::Result<()> {
//! let project = load_project(".".as_ref())?;
//! let compiler = Arc::new(WebpackCompiler::new(project.root(), project.cache_dir()));
//! let ctx = BuildContext::new(project, compiler)?;
//!
//! let graph = standard_graph(Arc::new(ctx))?;
//! graph.run("default").await?;
//! # Ok(())
//! # }
//! ```

pub mod archive;
pub mod banner;
pub mod builder;
pub mod compiler;
pub mod descriptor;
pub mod error;
pub mod metadata;
pub mod settings;
pub mod tasks;
pub mod utils;
pub mod watch;

pub use archive::{ArchiveMethod, Archiver, PackagedArchive};
pub use banner::{BannerSource, generate_banner, render_banner};
pub use builder::Builder;
pub use compiler::{BuildResult, Compiler, Diagnostic, WebpackCompiler};
pub use descriptor::{BuildDescriptor, DescriptorSet, Plugin, TransformRule, Variant};
pub use error::{Error, Result};
pub use metadata::{PackageMetadata, load_package};
pub use settings::{Project, ProjectConfig, load_project};
pub use tasks::{BuildContext, TaskGraph, standard_graph};
pub use watch::{FileChange, FileWatcher};
