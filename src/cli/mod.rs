//! Command line interface for the distribution task runner.
//!
//! This module parses arguments, sets up the build context and runs the
//! requested tasks.

mod args;

pub use args::Args;

use crate::{
    dist::{BuildContext, TaskGraph, WebpackCompiler, load_project, standard_graph},
    error::{CliError, Result},
};
use anyhow::Context as _;
use std::sync::Arc;

/// Main CLI entry point
pub async fn run() -> Result<i32> {
    run_with(Args::parse_args()).await
}

/// Runs the CLI with already parsed arguments.
pub async fn run_with(args: Args) -> Result<i32> {
    args.validate()
        .map_err(|reason| CliError::InvalidArguments { reason })?;

    let root = std::fs::canonicalize(&args.project_dir).with_context(|| {
        format!(
            "project directory {} does not exist",
            args.project_dir.display()
        )
    })?;

    let project = load_project(&root)?;
    log::debug!("Using project directory {}", project.root().display());

    let compiler = Arc::new(WebpackCompiler::new(project.root(), project.cache_dir()));
    let ctx = BuildContext::new(project, compiler)?;
    let graph = standard_graph(Arc::new(ctx))?;

    if args.list {
        print_tasks(&graph);
        return Ok(0);
    }

    let names = args.task_names();
    for name in &names {
        if graph.dependencies(name).is_none() {
            return Err(CliError::UnknownTask {
                task: name.to_string(),
                available: graph.names().collect::<Vec<_>>().join(", "),
            }
            .into());
        }
    }

    graph.run_all(&names).await?;
    Ok(0)
}

fn print_tasks(graph: &TaskGraph) {
    println!("Tasks:");
    for name in graph.names() {
        let deps = graph.dependencies(name).unwrap_or_default();
        if deps.is_empty() {
            println!("  {}", name);
        } else {
            println!("  {} -> {}", name, deps.join(", "));
        }
    }
}
