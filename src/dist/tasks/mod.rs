//! Task graph and the standard build tasks.

mod graph;
mod standard;

pub use graph::{TaskAction, TaskFuture, TaskGraph};
pub use standard::{
    BUNDLE, BUNDLE_MINIMALIST, BuildContext, DEFAULT, MKDIR, WATCH, ZIP, standard_graph,
};
