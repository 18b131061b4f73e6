//! Bundle build orchestration.
//!
//! - [`orchestrator`] - the long-lived [`Builder`] each bundle task drives

mod orchestrator;

pub use orchestrator::{Builder, report};
