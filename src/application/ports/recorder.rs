//! Recording port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Recording errors
#[derive(Debug, Clone, Error)]
pub enum RecordingError {
    #[error("recording program not found: {0}")]
    RecorderNotFound(String),

    #[error("failed to start recording process: {0}")]
    SpawnFailed(String),

    #[error("failed to stop recording process: {0}")]
    StopFailed(String),

    #[error("recording process exited abnormally: {0}")]
    AbnormalExit(String),

    #[error("failed to set up stop-key listener: {0}")]
    KeyListener(String),

    #[error("failed to register signal handler: {0}")]
    SignalSetup(String),
}

/// Port for interactive audio capture.
///
/// Records to `output_path` until one of three stop sources fires: an OS
/// interrupt/terminate signal, the designated stop key, or cancellation of
/// the caller's token. Whichever fires first stops the recording; the
/// implementation must not leave the capture process running or a global
/// input hook registered on any exit path.
#[async_trait]
pub trait Recorder: Send + Sync {
    async fn record(
        &self,
        cancel: &CancellationToken,
        output_path: &Path,
    ) -> Result<(), RecordingError>;
}
