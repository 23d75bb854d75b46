//! Sequential fail-fast pipeline orchestrator

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::domain::{MissingFieldError, PipelineState};

use super::ports::{EditorError, RecordingError, TranscriptionError};

/// Errors from a single pipeline stage
#[derive(Debug, Error)]
pub enum StageError {
    #[error(transparent)]
    Recording(#[from] RecordingError),

    #[error(transparent)]
    Transcription(#[from] TranscriptionError),

    #[error(transparent)]
    Editing(#[from] EditorError),

    #[error(transparent)]
    MissingField(#[from] MissingFieldError),

    #[error("creating output folder {path}: {detail}")]
    CreateFolder { path: String, detail: String },

    #[error("saving {path}: {detail}")]
    Save { path: String, detail: String },

    #[error("renaming output folder to {to}: {detail}")]
    Rename { to: String, detail: String },

    #[error("transcription timed out after {0} seconds")]
    Timeout(u64),
}

/// A stage error wrapped with the identity of the failing stage
#[derive(Debug, Error)]
#[error("{stage} stage failed: {source}")]
pub struct PipelineError {
    pub stage: &'static str,
    #[source]
    pub source: StageError,
}

/// One unit of the fixed pipeline sequence
#[async_trait]
pub trait Stage: Send + Sync {
    /// Stage identity, used in error wrapping and status reporting
    fn name(&self) -> &'static str;

    /// Run the stage against the shared state record
    async fn execute(
        &self,
        cancel: &CancellationToken,
        state: &mut PipelineState,
    ) -> Result<(), StageError>;
}

/// Callbacks for per-stage status updates
#[derive(Default)]
pub struct PipelineCallbacks {
    /// Called before a stage executes, with the stage name
    pub on_stage_start: Option<Box<dyn Fn(&'static str) + Send + Sync>>,
    /// Called after a stage completes successfully, with the stage name
    pub on_stage_end: Option<Box<dyn Fn(&'static str) + Send + Sync>>,
}

/// Fixed-sequence pipeline over one exclusively-owned state record.
///
/// Stages run strictly in order on the calling task. The first error stops
/// the run; completed stages' side effects are left in place for inspection.
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create a pipeline from an ordered stage sequence, fixed at
    /// orchestration time.
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Run all stages in order, short-circuiting on the first failure
    pub async fn run(
        &self,
        cancel: &CancellationToken,
        state: &mut PipelineState,
        callbacks: &PipelineCallbacks,
    ) -> Result<(), PipelineError> {
        for stage in &self.stages {
            if let Some(ref cb) = callbacks.on_stage_start {
                cb(stage.name());
            }

            stage
                .execute(cancel, state)
                .await
                .map_err(|source| PipelineError {
                    stage: stage.name(),
                    source,
                })?;

            if let Some(ref cb) = callbacks.on_stage_end {
                cb(stage.name());
            }
        }

        Ok(())
    }
}
