//! Declarative task graph with per-invocation memoization.

use crate::dist::error::{Error, Result};
use petgraph::{algo::toposort, graph::DiGraph};
use std::{
    collections::{HashMap, HashSet},
    future::Future,
    pin::Pin,
    sync::Arc,
    time::Instant,
};

/// Boxed future returned by a task action.
pub type TaskFuture = Pin<Box<dyn Future<Output = Result<()>> + Send>>;

/// Side-effecting body of a task.
pub type TaskAction = Arc<dyn Fn() -> TaskFuture + Send + Sync>;

struct Task {
    dependencies: Vec<String>,
    action: Option<TaskAction>,
}

/// Named tasks with dependency edges.
///
/// Running a task first runs its dependencies depth-first in declaration
/// order. Within one call to [`TaskGraph::run`] or [`TaskGraph::run_all`],
/// every task body runs at most once, however many dependents name it.
#[derive(Default)]
pub struct TaskGraph {
    tasks: HashMap<String, Task>,
    order: Vec<String>,
}

impl std::fmt::Debug for TaskGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskGraph")
            .field("tasks", &self.order)
            .finish()
    }
}

impl TaskGraph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Defines a task with an action.
    ///
    /// Fails if `name` is already defined or a dependency is listed twice.
    pub fn define<F, Fut>(&mut self, name: &str, dependencies: &[&str], action: F) -> Result<()>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<()>> + Send + 'static,
    {
        let action: TaskAction = Arc::new(move || Box::pin(action()) as TaskFuture);
        self.insert(name, dependencies, Some(action))
    }

    /// Defines a task that only groups its dependencies.
    pub fn define_group(&mut self, name: &str, dependencies: &[&str]) -> Result<()> {
        self.insert(name, dependencies, None)
    }

    fn insert(
        &mut self,
        name: &str,
        dependencies: &[&str],
        action: Option<TaskAction>,
    ) -> Result<()> {
        if self.tasks.contains_key(name) {
            return Err(Error::Task(format!("task '{name}' is already defined")));
        }

        let mut seen = HashSet::new();
        for dep in dependencies {
            if !seen.insert(*dep) {
                return Err(Error::Task(format!(
                    "task '{name}' lists dependency '{dep}' twice"
                )));
            }
        }

        self.tasks.insert(
            name.to_string(),
            Task {
                dependencies: dependencies.iter().map(|d| d.to_string()).collect(),
                action,
            },
        );
        self.order.push(name.to_string());
        Ok(())
    }

    /// Task names in definition order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Direct dependencies of a task.
    pub fn dependencies(&self, name: &str) -> Option<&[String]> {
        self.tasks.get(name).map(|t| t.dependencies.as_slice())
    }

    /// Checks that every dependency exists and the graph is acyclic.
    pub fn validate(&self) -> Result<()> {
        let mut graph = DiGraph::<&str, ()>::new();
        let nodes: HashMap<&str, _> = self
            .order
            .iter()
            .map(|name| (name.as_str(), graph.add_node(name.as_str())))
            .collect();

        for name in &self.order {
            for dep in &self.tasks[name].dependencies {
                let Some(&dep_node) = nodes.get(dep.as_str()) else {
                    return Err(Error::Task(format!(
                        "task '{name}' depends on unknown task '{dep}'"
                    )));
                };
                graph.add_edge(dep_node, nodes[name.as_str()], ());
            }
        }

        toposort(&graph, None).map_err(|cycle| {
            Error::Task(format!(
                "dependency cycle through task '{}'",
                graph[cycle.node_id()]
            ))
        })?;

        Ok(())
    }

    /// Execution order for running `names` in one invocation.
    pub fn plan(&self, names: &[&str]) -> Result<Vec<String>> {
        self.validate()?;

        let mut visited = HashSet::new();
        let mut plan = Vec::new();
        for name in names {
            if !self.tasks.contains_key(*name) {
                return Err(Error::Task(format!("task '{name}' is not defined")));
            }
            self.visit(name, &mut visited, &mut plan);
        }
        Ok(plan)
    }

    fn visit(&self, name: &str, visited: &mut HashSet<String>, plan: &mut Vec<String>) {
        if !visited.insert(name.to_string()) {
            return;
        }
        for dep in &self.tasks[name].dependencies {
            self.visit(dep, visited, plan);
        }
        plan.push(name.to_string());
    }

    /// Runs one task and its dependency closure.
    pub async fn run(&self, name: &str) -> Result<()> {
        self.run_all(&[name]).await
    }

    /// Runs several tasks sharing one memo set.
    ///
    /// Stops at the first failing action; later tasks are not started.
    pub async fn run_all(&self, names: &[&str]) -> Result<()> {
        for name in self.plan(names)? {
            let Some(action) = self.tasks[&name].action.clone() else {
                log::debug!("Task group '{}' complete", name);
                continue;
            };

            log::info!("Starting '{}'...", name);
            let started = Instant::now();

            if let Err(e) = action().await {
                log::error!("'{}' errored after {:.2?}", name, started.elapsed());
                return Err(e);
            }

            log::info!("Finished '{}' after {:.2?}", name, started.elapsed());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    fn recorder() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn record(graph: &mut TaskGraph, log: &Arc<Mutex<Vec<String>>>, name: &str, deps: &[&str]) {
        let log = log.clone();
        let task = name.to_string();
        graph
            .define(name, deps, move || {
                let log = log.clone();
                let task = task.clone();
                async move {
                    log.lock().unwrap().push(task);
                    Ok(())
                }
            })
            .unwrap();
    }

    fn standard_shape(log: &Arc<Mutex<Vec<String>>>) -> TaskGraph {
        let mut graph = TaskGraph::new();
        record(&mut graph, log, "mkdir", &[]);
        record(&mut graph, log, "bundle", &["mkdir"]);
        record(&mut graph, log, "bundle-minimalist", &["mkdir"]);
        graph.define_group("default", &["bundle", "bundle-minimalist"]).unwrap();
        graph
    }

    #[tokio::test]
    async fn dependencies_run_first() {
        let log = recorder();
        let graph = standard_shape(&log);
        graph.run("bundle").await.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["mkdir", "bundle"]);
    }

    #[tokio::test]
    async fn shared_dependency_runs_once_per_invocation() {
        let log = recorder();
        let graph = standard_shape(&log);
        graph.run("default").await.unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["mkdir", "bundle", "bundle-minimalist"]
        );

        // A fresh invocation starts with an empty memo set.
        graph.run("bundle").await.unwrap();
        assert_eq!(log.lock().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn run_all_shares_the_memo_set() {
        let log = recorder();
        let graph = standard_shape(&log);
        graph.run_all(&["bundle", "bundle-minimalist"]).await.unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["mkdir", "bundle", "bundle-minimalist"]
        );
    }

    #[tokio::test]
    async fn failure_stops_dependents() {
        let log = recorder();
        let mut graph = TaskGraph::new();
        graph
            .define("zip", &[], || async {
                Err(Error::GenericError("zip exited with 12".into()))
            })
            .unwrap();
        record(&mut graph, &log, "after", &["zip"]);

        assert!(graph.run("after").await.is_err());
        assert!(log.lock().unwrap().is_empty());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let log = recorder();
        let mut graph = standard_shape(&log);
        assert!(graph.define_group("mkdir", &[]).is_err());
        assert!(graph.define_group("twice", &["mkdir", "mkdir"]).is_err());
    }

    #[test]
    fn unknown_dependency_and_task_are_rejected() {
        let mut graph = TaskGraph::new();
        graph.define_group("watch", &["bundle"]).unwrap();
        assert!(graph.validate().is_err());
        assert!(TaskGraph::new().plan(&["nope"]).is_err());
    }

    #[test]
    fn cycles_are_rejected() {
        let mut graph = TaskGraph::new();
        graph.define_group("a", &["b"]).unwrap();
        graph.define_group("b", &["a"]).unwrap();
        let err = graph.validate().unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn plan_lists_names_in_order() {
        let log = recorder();
        let graph = standard_shape(&log);
        assert_eq!(
            graph.plan(&["default"]).unwrap(),
            vec!["mkdir", "bundle", "bundle-minimalist", "default"]
        );
        assert_eq!(
            graph.names().collect::<Vec<_>>(),
            vec!["mkdir", "bundle", "bundle-minimalist", "default"]
        );
    }
}
