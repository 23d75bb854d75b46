//! Text-editing port interface

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Headline, HeadlineError};

/// Errors from the remote text-editing service.
///
/// The service returns JSON-in-JSON: a completion envelope whose first
/// choice's message content must itself parse as the role's expected shape.
/// Each parse layer has its own kind so failures are diagnosable. No retry
/// happens at this layer; a single failed call surfaces immediately.
#[derive(Debug, Error)]
pub enum EditorError {
    #[error("API request failed: {0}")]
    Transport(String),

    #[error("API request failed with status code {code}: {body}")]
    NonOkStatus { code: u16, body: String },

    #[error("failed to decode API response: {0}")]
    Decode(String),

    #[error("no choices in API response")]
    EmptyChoices,

    #[error("malformed {role} payload: {detail}")]
    MalformedPayload { role: &'static str, detail: String },

    #[error("unusable headline: {0}")]
    UnusableHeadline(#[from] HeadlineError),
}

/// Cleaned transcript plus its summary, as produced by the editor role
#[derive(Debug, Clone)]
pub struct EditedTranscript {
    pub cleaned_transcription: String,
    pub summary: String,
}

/// Port for transcript cleanup, summarization, and headline generation
#[async_trait]
pub trait TranscriptEditor: Send + Sync {
    /// Clean up a raw transcript and summarize it
    async fn edit_and_summarize(&self, transcript: &str) -> Result<EditedTranscript, EditorError>;

    /// Generate a short headline from a summary, usable as a directory name
    async fn create_headline(&self, summary: &str) -> Result<Headline, EditorError>;
}
