//! Bundler invocation.
//!
//! The bundler itself is an external tool. This module defines the
//! [`Compiler`] seam a [`BuildDescriptor`] is run through, the
//! [`BuildResult`] it reports, and the webpack-backed implementation.

mod stats;
mod template;
mod webpack;

pub use stats::parse_stats;
pub use template::render_config;
pub use webpack::WebpackCompiler;

use crate::dist::{descriptor::BuildDescriptor, error::Error};
use std::{fmt, future::Future, pin::Pin};

/// Boxed future returned by [`Compiler::run`].
pub type CompileFuture<'a> = Pin<Box<dyn Future<Output = BuildResult> + Send + 'a>>;

/// A soft compilation error reported by the bundler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Diagnostic text.
    pub message: String,
    /// Module the diagnostic refers to, when known.
    pub module: Option<String>,
}

impl Diagnostic {
    /// Diagnostic without a module.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            module: None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.module {
            Some(module) => write!(f, "{}: {}", module, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Outcome of one bundler run.
///
/// A hard error and diagnostics are independent: a run may have either,
/// both or neither.
#[derive(Debug, Default)]
pub struct BuildResult {
    /// Compiler-level failure.
    pub hard_error: Option<Error>,
    /// Soft compilation errors, in reported order.
    pub diagnostics: Vec<Diagnostic>,
}

impl BuildResult {
    /// Result of a clean run.
    pub fn ok() -> Self {
        Self::default()
    }

    /// Result of a run that failed before producing stats.
    pub fn failed(error: Error) -> Self {
        Self {
            hard_error: Some(error),
            diagnostics: Vec::new(),
        }
    }

    /// True when there is neither a hard error nor a diagnostic.
    pub fn is_clean(&self) -> bool {
        self.hard_error.is_none() && self.diagnostics.is_empty()
    }
}

/// Runs a descriptor through a bundler.
///
/// Implementations keep whatever state makes repeated runs incremental; a
/// single instance is reused for every rebuild of a descriptor.
pub trait Compiler: Send + Sync {
    /// Runs one build. Never fails outright; problems land in the result.
    fn run<'a>(&'a self, descriptor: &'a BuildDescriptor) -> CompileFuture<'a>;
}
