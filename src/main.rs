//! Kodegen Bundler Dist - task runner for JavaScript library distributables.
//!
//! This binary runs named build tasks (bundle, bundle-minimalist, zip, watch)
//! with their dependencies and exits non-zero when a task fails.

use std::process;

#[tokio::main]
async fn main() {
    // Initialize logging, defaulting to info so task progress is visible
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Run CLI and get exit code
    let exit_code = match kodegen_bundler_dist::cli::run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    };

    process::exit(exit_code);
}
