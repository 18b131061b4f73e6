//! webpack-backed [`Compiler`].

use super::{BuildResult, CompileFuture, Compiler, parse_stats, render_config};
use crate::dist::{
    descriptor::BuildDescriptor,
    error::{Error, ErrorExt, Result},
};
use std::{
    path::{Path, PathBuf},
    process::Stdio,
};
use tokio::process::Command;

/// Runs descriptors through the webpack CLI.
///
/// The rendered config enables webpack's filesystem cache under
/// `cache_dir`, so reusing one instance across rebuilds keeps builds
/// incremental even though each run is a fresh process.
#[derive(Debug, Clone)]
pub struct WebpackCompiler {
    project_root: PathBuf,
    cache_dir: PathBuf,
}

impl WebpackCompiler {
    /// Creates a compiler running in `project_root`, caching under `cache_dir`.
    pub fn new(project_root: impl Into<PathBuf>, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_root: project_root.into(),
            cache_dir: cache_dir.into(),
        }
    }

    /// Resolves the webpack executable.
    ///
    /// Order: the project's `node_modules/.bin/webpack`, `webpack` in PATH,
    /// then `npx webpack`.
    fn resolve_command(&self) -> Result<(PathBuf, Vec<String>)> {
        let local = self.project_root.join("node_modules/.bin/webpack");
        if local.is_file() {
            return Ok((local, Vec::new()));
        }
        if let Ok(path) = which::which("webpack") {
            return Ok((path, Vec::new()));
        }
        if let Ok(npx) = which::which("npx") {
            log::debug!("webpack not installed locally, falling back to npx");
            return Ok((npx, vec!["webpack".into()]));
        }
        Err(Error::ToolNotFound("webpack".into()))
    }

    async fn write_config(&self, descriptor: &BuildDescriptor) -> Result<PathBuf> {
        tokio::fs::create_dir_all(&self.cache_dir)
            .await
            .fs_context("creating bundler cache directory", &self.cache_dir)?;

        let config = render_config(descriptor, &self.cache_dir)?;
        let config_path = self
            .cache_dir
            .join(format!("webpack.{}.config.js", descriptor.variant().label()));

        tokio::fs::write(&config_path, config)
            .await
            .fs_context("writing webpack config", &config_path)?;

        Ok(config_path)
    }

    async fn compile(&self, descriptor: &BuildDescriptor) -> Result<BuildResult> {
        let config_path = self.write_config(descriptor).await?;
        let (program, mut args) = self.resolve_command()?;
        args.extend([
            "--config".to_string(),
            config_path.to_string_lossy().into_owned(),
            "--json".to_string(),
        ]);

        log::debug!("Running {} {}", program.display(), args.join(" "));

        let output = Command::new(&program)
            .args(&args)
            .current_dir(&self.project_root)
            .stdin(Stdio::null())
            .output()
            .await
            .fs_context("spawning webpack", &program)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Compilation errors also produce a non-zero exit, but still print stats.
        match parse_stats(&stdout) {
            Ok(diagnostics) => Ok(BuildResult {
                hard_error: None,
                diagnostics,
            }),
            Err(parse_error) => {
                log::debug!("webpack stats were not JSON: {}", parse_error);
                Err(Error::CommandFailed {
                    command: command_line(&program, &args),
                    status: output.status.to_string(),
                    stderr: stderr.trim().to_string(),
                })
            }
        }
    }
}

fn command_line(program: &Path, args: &[String]) -> String {
    format!("{} {}", program.display(), args.join(" "))
}

impl Compiler for WebpackCompiler {
    fn run<'a>(&'a self, descriptor: &'a BuildDescriptor) -> CompileFuture<'a> {
        Box::pin(async move {
            match self.compile(descriptor).await {
                Ok(result) => result,
                Err(e) => BuildResult::failed(e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::{
        descriptor::DescriptorSet,
        settings::{Project, ProjectConfig},
    };

    #[tokio::test]
    async fn writes_one_config_per_variant() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::new(dir.path(), ProjectConfig::default());
        let set = DescriptorSet::new(&project, "/* b */").unwrap();
        let compiler = WebpackCompiler::new(dir.path(), project.cache_dir());

        let full = compiler.write_config(&set.full).await.unwrap();
        let minimalist = compiler.write_config(&set.minimalist).await.unwrap();

        assert_ne!(full, minimalist);
        assert!(full.ends_with("webpack.full.config.js"));
        let rendered = std::fs::read_to_string(&minimalist).unwrap();
        assert!(rendered.contains("jsoneditor-minimalist.js"));
    }

    #[tokio::test]
    async fn local_webpack_binary_is_preferred() {
        let dir = tempfile::tempdir().unwrap();
        let bin = dir.path().join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        std::fs::write(bin.join("webpack"), "").unwrap();

        let compiler = WebpackCompiler::new(dir.path(), dir.path().join(".cache"));
        let (program, args) = compiler.resolve_command().unwrap();
        assert_eq!(program, bin.join("webpack"));
        assert!(args.is_empty());
    }

    #[cfg(unix)]
    fn install_webpack(dir: &Path, script: &str, mode: u32) {
        use std::os::unix::fs::PermissionsExt;

        let bin = dir.join("node_modules/.bin");
        std::fs::create_dir_all(&bin).unwrap();
        let path = bin.join("webpack");
        std::fs::write(&path, format!("#!/bin/sh\n{script}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    fn compiler_with(script: &str, mode: u32) -> (tempfile::TempDir, WebpackCompiler, DescriptorSet) {
        let dir = tempfile::tempdir().unwrap();
        install_webpack(dir.path(), script, mode);
        let project = Project::new(dir.path(), ProjectConfig::default());
        let set = DescriptorSet::new(&project, "/* b */").unwrap();
        let compiler = WebpackCompiler::new(dir.path(), project.cache_dir());
        (dir, compiler, set)
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failed_compilation_with_stats_yields_diagnostics() {
        let (_dir, compiler, set) = compiler_with(
            r#"echo '{"errors":[{"message":"a"},{"message":"b","moduleName":"./src/x.js"}]}'
exit 1"#,
            0o755,
        );

        let result = compiler.run(&set.full).await;
        assert!(result.hard_error.is_none());
        let rendered: Vec<String> = result.diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(rendered, vec!["a", "./src/x.js: b"]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn output_without_stats_is_a_hard_error() {
        let (_dir, compiler, set) = compiler_with("echo boom >&2\nexit 2", 0o755);

        let result = compiler.run(&set.minimalist).await;
        assert!(result.diagnostics.is_empty());
        match result.hard_error {
            Some(Error::CommandFailed { command, stderr, .. }) => {
                assert_eq!(stderr, "boom");
                assert!(command.ends_with("--json"));
            }
            other => panic!("expected CommandFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn spawn_failure_is_a_hard_error() {
        let (_dir, compiler, set) = compiler_with("exit 0", 0o644);

        let result = compiler.run(&set.full).await;
        assert!(result.diagnostics.is_empty());
        assert!(matches!(result.hard_error, Some(Error::Fs { .. })));
    }
}
