//! Domain layer - Core business logic
//!
//! Contains the pipeline state record, value objects, and domain errors.
//! This layer has no dependencies on external systems.

pub mod config;
pub mod headline;
pub mod state;

// Re-export common types
pub use config::{AppConfig, ConfigError};
pub use headline::{Headline, HeadlineError};
pub use state::{MissingFieldError, PipelineState};
