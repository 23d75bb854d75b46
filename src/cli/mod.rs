//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, and the main app runner.

pub mod app;
pub mod args;
pub mod presenter;

// Re-export commonly used types
pub use app::{run_pipeline, EXIT_ERROR, EXIT_SUCCESS};
pub use args::{Cli, RunOptions};
pub use presenter::Presenter;
