//! Remote transcription adapters

pub mod sniff;
pub mod whisper;

pub use whisper::{RetryPolicy, WhisperClient, ALLOWED_EXTENSIONS, MAX_FILE_SIZE};
