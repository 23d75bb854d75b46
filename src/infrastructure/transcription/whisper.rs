//! Whisper API transcription client adapter

use std::path::Path;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tokio::fs;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{Transcriber, TranscriptionError};

use super::sniff;

/// Upper bound on the uploaded audio file
pub const MAX_FILE_SIZE: u64 = 25 * 1024 * 1024;

/// File extensions the transcription endpoint accepts
pub const ALLOWED_EXTENSIONS: &[&str] =
    &[".mp3", ".mp4", ".mpeg", ".mpga", ".m4a", ".wav", ".webm"];

/// Model selector sent with every upload
const TRANSCRIPTION_MODEL: &str = "whisper-1";

/// Per-attempt HTTP timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Exponential backoff policy for transient upload failures
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub initial_interval: Duration,
    pub multiplier: f64,
    pub max_interval: Duration,
    pub max_elapsed: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            initial_interval: Duration::from_millis(500),
            multiplier: 2.0,
            max_interval: Duration::from_secs(10),
            max_elapsed: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Whisper API client.
///
/// Validates the candidate file before any network call, then uploads it as
/// a multipart form under a bounded exponential-backoff retry loop. Only
/// transport failures and non-200 statuses are retried; validation and
/// decode failures abort immediately.
pub struct WhisperClient {
    endpoint: String,
    api_key: String,
    retry: RetryPolicy,
    client: reqwest::Client,
}

impl WhisperClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            client: reqwest::Client::new(),
        }
    }

    /// Override the retry policy (tests shrink the intervals)
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Run the validation checks in order, each with its own error kind,
    /// and return the file name + bytes ready for upload.
    async fn load_validated(&self, path: &Path) -> Result<(String, Vec<u8>), TranscriptionError> {
        let metadata = fs::metadata(path)
            .await
            .map_err(|_| TranscriptionError::FileNotFound(path.display().to_string()))?;

        if metadata.len() > MAX_FILE_SIZE {
            return Err(TranscriptionError::FileTooLarge {
                size: metadata.len(),
                limit: MAX_FILE_SIZE,
            });
        }

        let ext = extension_of(path);
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(TranscriptionError::BadExtension(ext));
        }

        let mut file = fs::File::open(path)
            .await
            .map_err(|e| TranscriptionError::ReadFailed(e.to_string()))?;

        let mut header = vec![0u8; sniff::HEADER_LEN];
        let read = file
            .read(&mut header)
            .await
            .map_err(|e| TranscriptionError::ReadFailed(e.to_string()))?;
        header.truncate(read);

        let mime = sniff::detect_mime(&header).unwrap_or("application/octet-stream");
        if !sniff::is_allowed_media(mime) {
            return Err(TranscriptionError::BadContentType(mime.to_string()));
        }

        // reset the cursor to the start before upload
        file.seek(std::io::SeekFrom::Start(0))
            .await
            .map_err(|e| TranscriptionError::ReadFailed(e.to_string()))?;

        let mut bytes = Vec::with_capacity(metadata.len() as usize);
        file.read_to_end(&mut bytes)
            .await
            .map_err(|e| TranscriptionError::ReadFailed(e.to_string()))?;

        let file_name = path
            .file_name()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or("audio")
            .to_string();

        Ok((file_name, bytes))
    }

    fn build_form(file_name: &str, bytes: Vec<u8>) -> Form {
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        Form::new().part("file", part).text("model", TRANSCRIPTION_MODEL)
    }

    /// One upload attempt: send the multipart request and decode the body
    async fn attempt(&self, file_name: &str, bytes: &[u8]) -> Result<String, TranscriptionError> {
        let form = Self::build_form(file_name, bytes.to_vec());

        let response = self
            .client
            .post(&self.endpoint)
            .timeout(REQUEST_TIMEOUT)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscriptionError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TranscriptionError::NonOkStatus(status.as_u16()));
        }

        let body: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Decode(e.to_string()))?;

        Ok(body.text)
    }
}

/// Lowercased extension of a path, with the leading dot
fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(std::ffi::OsStr::to_str)
        .map(|e| format!(".{}", e.to_lowercase()))
        .unwrap_or_default()
}

#[async_trait]
impl Transcriber for WhisperClient {
    async fn transcribe(
        &self,
        cancel: &CancellationToken,
        audio_path: &Path,
    ) -> Result<String, TranscriptionError> {
        let (file_name, bytes) = self.load_validated(audio_path).await?;

        let started = Instant::now();
        let mut interval = self.retry.initial_interval;

        loop {
            let err = match self.attempt(&file_name, &bytes).await {
                Ok(text) => return Ok(text),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => err,
            };

            if cancel.is_cancelled() || started.elapsed() + interval > self.retry.max_elapsed {
                return Err(TranscriptionError::RetriesExhausted(Box::new(err)));
            }

            // backoff sleep doubles as a cancellation point
            tokio::select! {
                _ = cancel.cancelled() => {
                    return Err(TranscriptionError::RetriesExhausted(Box::new(err)));
                }
                _ = tokio::time::sleep(interval) => {}
            }

            interval = std::cmp::min(
                Duration::from_secs_f64(interval.as_secs_f64() * self.retry.multiplier),
                self.retry.max_interval,
            );
        }
    }
}
