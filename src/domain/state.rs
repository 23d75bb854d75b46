//! Shared pipeline state record

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Error when a stage reads a field that no earlier stage populated
#[derive(Debug, Clone, Error)]
#[error("field '{0}' was not populated by an earlier stage")]
pub struct MissingFieldError(pub &'static str);

/// State record threaded through the pipeline stages.
///
/// Exactly one instance exists per run. Each text field is written by exactly
/// one stage and read by at most one later stage; the empty string means
/// "not yet populated". Stages validate their inputs through the `require_*`
/// accessors at entry instead of trusting upstream.
#[derive(Debug, Clone)]
pub struct PipelineState {
    timestamp: String,
    out_folder: PathBuf,
    output_file: String,
    transcription: String,
    cleaned_transcription: String,
    summary: String,
    headline: String,
}

impl PipelineState {
    /// Create the initial state for a run. Only the timestamp and the derived
    /// output folder are populated before the first stage executes.
    pub fn new(timestamp: impl Into<String>, out_folder: impl Into<PathBuf>) -> Self {
        Self {
            timestamp: timestamp.into(),
            out_folder: out_folder.into(),
            output_file: String::new(),
            transcription: String::new(),
            cleaned_transcription: String::new(),
            summary: String::new(),
            headline: String::new(),
        }
    }

    /// Run timestamp, immutable after creation
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Current output folder path
    pub fn out_folder(&self) -> &Path {
        &self.out_folder
    }

    /// Full path of the recorded audio file
    pub fn audio_path(&self) -> Result<PathBuf, MissingFieldError> {
        Ok(self.out_folder.join(self.require_output_file()?))
    }

    pub fn set_output_file(&mut self, name: impl Into<String>) {
        self.output_file = name.into();
    }

    pub fn require_output_file(&self) -> Result<&str, MissingFieldError> {
        Self::require("output_file", &self.output_file)
    }

    pub fn set_transcription(&mut self, text: impl Into<String>) {
        self.transcription = text.into();
    }

    pub fn require_transcription(&self) -> Result<&str, MissingFieldError> {
        Self::require("transcription", &self.transcription)
    }

    pub fn set_cleaned_transcription(&mut self, text: impl Into<String>) {
        self.cleaned_transcription = text.into();
    }

    pub fn require_cleaned_transcription(&self) -> Result<&str, MissingFieldError> {
        Self::require("cleaned_transcription", &self.cleaned_transcription)
    }

    pub fn set_summary(&mut self, text: impl Into<String>) {
        self.summary = text.into();
    }

    pub fn require_summary(&self) -> Result<&str, MissingFieldError> {
        Self::require("summary", &self.summary)
    }

    pub fn headline(&self) -> &str {
        &self.headline
    }

    /// Record the generated headline and the folder's new identity.
    /// The folder path changes exactly once per run, here.
    pub fn set_headline(&mut self, headline: impl Into<String>, renamed_folder: impl Into<PathBuf>) {
        self.headline = headline.into();
        self.out_folder = renamed_folder.into();
    }

    fn require<'a>(name: &'static str, value: &'a str) -> Result<&'a str, MissingFieldError> {
        if value.is_empty() {
            Err(MissingFieldError(name))
        } else {
            Ok(value)
        }
    }
}
