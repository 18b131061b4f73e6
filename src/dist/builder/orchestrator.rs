//! Long-lived bundle builder.
//!
//! This module provides the [`Builder`] that owns one descriptor and the
//! compiler it is run through, and serializes rebuilds of that pair.

use crate::dist::{
    banner::BannerSource,
    compiler::{BuildResult, Compiler},
    descriptor::BuildDescriptor,
    error::Result,
};
use std::{sync::Arc, time::Instant};
use tokio::sync::Mutex;

/// One bundle output and the compiler state that builds it.
///
/// A builder is created once per process and reused for every rebuild so the
/// compiler's cache survives between runs. Concurrent [`Builder::rebuild`]
/// calls queue on an internal lock and run one after another in arrival order.
///
/// # Examples
///
/// ```no_run
/// use kodegen_bundler_dist::dist::{
///     BannerSource, Builder, DescriptorSet, Project, ProjectConfig, WebpackCompiler,
/// };
/// use std::sync::Arc;
///
/// # async fn example() -> kodegen_bundler_dist::dist::Result<()> {
/// let project = Project::new(".", ProjectConfig::default());
/// let banner = BannerSource::new(project.header_path(), project.package_json_path());
/// let set = DescriptorSet::new(&project, &banner.banner()?)?;
/// let compiler = Arc::new(WebpackCompiler::new(project.root(), project.cache_dir()));
///
/// let builder = Builder::new(set.full, compiler, banner);
/// let result = builder.rebuild().await?;
/// println!("{} diagnostics", result.diagnostics.len());
/// # Ok(())
/// # }
/// ```
pub struct Builder {
    descriptor: Mutex<BuildDescriptor>,
    compiler: Arc<dyn Compiler>,
    banner: BannerSource,
    output_filename: String,
}

impl std::fmt::Debug for Builder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Builder")
            .field("output_filename", &self.output_filename)
            .field("banner", &self.banner)
            .field("compiler", &"<dyn Compiler>")
            .finish()
    }
}

impl Builder {
    /// Wraps a descriptor and the compiler that will run it.
    pub fn new(
        descriptor: BuildDescriptor,
        compiler: Arc<dyn Compiler>,
        banner: BannerSource,
    ) -> Self {
        let output_filename = descriptor.output_filename().to_string();
        Self {
            descriptor: Mutex::new(descriptor),
            compiler,
            banner,
            output_filename,
        }
    }

    /// Name of the bundle this builder writes.
    pub fn output_filename(&self) -> &str {
        &self.output_filename
    }

    /// Snapshot of the descriptor as it will be used by the next run.
    pub async fn descriptor(&self) -> BuildDescriptor {
        self.descriptor.lock().await.clone()
    }

    /// Refreshes the banner and runs one build.
    ///
    /// Hard build errors and diagnostics are logged and returned in the
    /// [`BuildResult`]; they never fail this call. Only an unreadable banner
    /// template or project metadata is returned as an error.
    pub async fn rebuild(&self) -> Result<BuildResult> {
        let mut descriptor = match self.descriptor.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                log::info!("{} build in progress, rebuild queued", self.output_filename);
                self.descriptor.lock().await
            }
        };

        descriptor.refresh_banner(self.banner.banner()?);

        let started = Instant::now();
        let result = self.compiler.run(&descriptor).await;
        report(&result);

        log::info!(
            "bundled {} in {:.2?}",
            self.output_filename,
            started.elapsed()
        );

        Ok(result)
    }
}

/// Logs the hard error and every diagnostic of a run.
pub fn report(result: &BuildResult) {
    if let Some(err) = &result.hard_error {
        log::error!("{}", err);
    }
    for diagnostic in &result.diagnostics {
        log::error!("{}", diagnostic);
    }
}
