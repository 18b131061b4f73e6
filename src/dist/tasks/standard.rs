//! The project's build tasks.

use super::TaskGraph;
use crate::dist::{
    archive::Archiver,
    banner::BannerSource,
    builder::Builder,
    compiler::Compiler,
    descriptor::DescriptorSet,
    error::{Context, Result},
    settings::Project,
    utils::fs::create_dir_all,
    watch,
};
use std::sync::{Arc, OnceLock, Weak};

/// Creates the output directory.
pub const MKDIR: &str = "mkdir";
/// Builds the full bundle.
pub const BUNDLE: &str = "bundle";
/// Builds the minimalist bundle.
pub const BUNDLE_MINIMALIST: &str = "bundle-minimalist";
/// Packages the distribution archive.
pub const ZIP: &str = "zip";
/// Rebuilds the full bundle on source changes.
pub const WATCH: &str = "watch";
/// Task run when none is named.
pub const DEFAULT: &str = "default";

/// Long-lived state shared by every task of one process.
#[derive(Debug)]
pub struct BuildContext {
    project: Project,
    full: Arc<Builder>,
    minimalist: Arc<Builder>,
    archiver: Archiver,
}

impl BuildContext {
    /// Builds both descriptors and their builders.
    ///
    /// Reads the banner once up front, so a missing header template or
    /// `package.json` aborts before any task runs.
    pub fn new(project: Project, compiler: Arc<dyn Compiler>) -> Result<Self> {
        let banner = BannerSource::new(project.header_path(), project.package_json_path());
        let set = DescriptorSet::new(&project, &banner.banner()?)?;

        Ok(Self {
            full: Arc::new(Builder::new(set.full, compiler.clone(), banner.clone())),
            minimalist: Arc::new(Builder::new(set.minimalist, compiler, banner)),
            archiver: Archiver::new(&project),
            project,
        })
    }

    /// Replaces the archiver, e.g. to force the built-in writer.
    pub fn with_archiver(mut self, archiver: Archiver) -> Self {
        self.archiver = archiver;
        self
    }

    /// Project layout.
    pub fn project(&self) -> &Project {
        &self.project
    }

    /// Full bundle builder.
    pub fn full(&self) -> &Arc<Builder> {
        &self.full
    }

    /// Minimalist bundle builder.
    pub fn minimalist(&self) -> &Arc<Builder> {
        &self.minimalist
    }
}

/// Registers `mkdir`, `bundle`, `bundle-minimalist`, `zip`, `watch` and
/// `default`.
///
/// The graph is returned in an `Arc` because `watch` re-runs `bundle`
/// through the same graph and holds a weak handle to it.
pub fn standard_graph(ctx: Arc<BuildContext>) -> Result<Arc<TaskGraph>> {
    let mut graph = TaskGraph::new();

    let dist = ctx.project.dist_dir();
    graph.define(MKDIR, &[], move || {
        let dist = dist.clone();
        async move { create_dir_all(&dist).await }
    })?;

    let full = ctx.full.clone();
    graph.define(BUNDLE, &[MKDIR], move || {
        let full = full.clone();
        async move { full.rebuild().await.map(|_| ()) }
    })?;

    let minimalist = ctx.minimalist.clone();
    graph.define(BUNDLE_MINIMALIST, &[MKDIR], move || {
        let minimalist = minimalist.clone();
        async move { minimalist.rebuild().await.map(|_| ()) }
    })?;

    let archiver = ctx.archiver.clone();
    graph.define(ZIP, &[], move || {
        let archiver = archiver.clone();
        async move { archiver.package().await.map(|_| ()) }
    })?;

    let handle: Arc<OnceLock<Weak<TaskGraph>>> = Arc::new(OnceLock::new());
    let watch_handle = handle.clone();
    let source_dir = ctx.project.source_dir();
    graph.define(WATCH, &[BUNDLE], move || {
        let handle = watch_handle.clone();
        let source_dir = source_dir.clone();
        async move {
            let graph = handle
                .get()
                .and_then(Weak::upgrade)
                .context("task graph dropped before watch started")?;
            watch::watch(source_dir, move |_change| {
                let graph = graph.clone();
                async move { graph.run(BUNDLE).await }
            })
            .await
        }
    })?;

    graph.define_group(DEFAULT, &[BUNDLE, BUNDLE_MINIMALIST])?;
    graph.validate()?;

    let graph = Arc::new(graph);
    handle
        .set(Arc::downgrade(&graph))
        .ok()
        .context("task graph handle already set")?;
    Ok(graph)
}
