//! Application configuration value object

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Default transcription endpoint
pub const DEFAULT_TRANSCRIPTION_ENDPOINT: &str = "https://api.openai.com/v1/audio/transcriptions";

/// Default chat-completion endpoint
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

/// Default root directory for recordings
pub const DEFAULT_RECORDINGS_DIR: &str = "./recordings";

/// Error when configuration fails
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("OPENAI_API_KEY environment variable is not set")]
    MissingApiKey,
}

/// Application configuration.
///
/// Resolved once at startup, before the pipeline runs. The API key is
/// required; the endpoints and recordings directory have defaults and exist
/// mainly so tests can point the clients at local servers.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub transcription_endpoint: String,
    pub chat_endpoint: String,
    pub recordings_dir: PathBuf,
}

impl AppConfig {
    /// Load configuration from the process environment.
    /// A missing API key fails the run before any stage executes.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        Ok(Self {
            api_key,
            transcription_endpoint: env::var("VOICE_SCRIBE_TRANSCRIPTION_URL")
                .unwrap_or_else(|_| DEFAULT_TRANSCRIPTION_ENDPOINT.to_string()),
            chat_endpoint: env::var("VOICE_SCRIBE_CHAT_URL")
                .unwrap_or_else(|_| DEFAULT_CHAT_ENDPOINT.to_string()),
            recordings_dir: env::var("VOICE_SCRIBE_RECORDINGS_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_RECORDINGS_DIR)),
        })
    }
}
