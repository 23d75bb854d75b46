//! Application layer - Pipeline orchestration and port interfaces
//!
//! Contains the stage sequence, the fail-fast pipeline runner, and the trait
//! definitions for external system interactions.

pub mod pipeline;
pub mod ports;
pub mod stages;

// Re-export orchestration types
pub use pipeline::{Pipeline, PipelineCallbacks, PipelineError, Stage, StageError};
pub use stages::{
    EditStage, HeadlineStage, RecordStage, SaveStage, TranscribeStage, TRANSCRIBE_TIMEOUT,
};
