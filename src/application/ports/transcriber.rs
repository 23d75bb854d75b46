//! Transcription port interface

use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

/// Transcription errors.
///
/// The file-validation kinds are distinct so each failing pre-upload check is
/// diagnosable on its own; none of them is retried. Transport failures and
/// non-200 responses are transient and retried under backoff, surfacing as
/// `RetriesExhausted` wrapping the last cause once the budget runs out.
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    #[error("audio file does not exist: {0}")]
    FileNotFound(String),

    #[error("audio file is {size} bytes, exceeding the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("unsupported file extension: {0:?}")]
    BadExtension(String),

    #[error("unsupported content type: {0}")]
    BadContentType(String),

    #[error("failed to read audio file: {0}")]
    ReadFailed(String),

    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API request failed with status code {0}")]
    NonOkStatus(u16),

    #[error("failed to decode API response: {0}")]
    Decode(String),

    #[error("transcription failed after retries: {0}")]
    RetriesExhausted(Box<TranscriptionError>),
}

impl TranscriptionError {
    /// Whether a failed attempt may be retried. Validation and decode
    /// failures are deterministic, only network-level failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::NonOkStatus(_))
    }
}

/// Port for remote audio transcription
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe the audio file at `audio_path` to plain text.
    /// Cancelling the token aborts any in-flight retry backoff.
    async fn transcribe(
        &self,
        cancel: &CancellationToken,
        audio_path: &Path,
    ) -> Result<String, TranscriptionError>;
}
