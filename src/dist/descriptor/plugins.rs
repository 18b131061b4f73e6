//! Bundler plugin chain entries.

use crate::dist::error::Result;
use regex::Regex;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A plugin applied by the bundler, in chain order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Plugin {
    /// Text prologue injected at the top of the output.
    Banner {
        /// Banner text, refreshed before every run.
        text: String,
        /// Insert verbatim instead of wrapping in a comment.
        raw: bool,
        /// Only prepend to entry chunks.
        entry_only: bool,
    },
    /// Module requests matching `pattern` resolve to `replacement` instead.
    ModuleReplacement {
        /// Request pattern source.
        pattern: String,
        /// Stub module path.
        replacement: PathBuf,
    },
    /// Minify the emitted code.
    Minify,
}

impl Plugin {
    /// Raw, entry-only banner plugin.
    pub fn banner(text: impl Into<String>) -> Self {
        Plugin::Banner {
            text: text.into(),
            raw: true,
            entry_only: true,
        }
    }

    /// Module replacement plugin, checking that `pattern` compiles.
    pub fn module_replacement(pattern: &str, replacement: &Path) -> Result<Self> {
        Regex::new(pattern)?;
        Ok(Plugin::ModuleReplacement {
            pattern: pattern.to_string(),
            replacement: replacement.to_path_buf(),
        })
    }

    /// Whether this module replacement applies to the module request.
    ///
    /// Always false for other plugin kinds.
    pub fn replaces(&self, request: &str) -> bool {
        match self {
            Plugin::ModuleReplacement { pattern, .. } => {
                Regex::new(pattern).is_ok_and(|re| re.is_match(request))
            }
            _ => false,
        }
    }

    /// Whether this is a module replacement plugin.
    pub fn is_module_replacement(&self) -> bool {
        matches!(self, Plugin::ModuleReplacement { .. })
    }
}
