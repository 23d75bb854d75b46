//! Infrastructure layer - Adapter implementations
//!
//! Contains concrete implementations of the port interfaces,
//! integrating with external systems like sox and the OpenAI APIs.

pub mod editing;
pub mod recording;
pub mod transcription;

// Re-export adapters
pub use editing::AiEditor;
pub use recording::SoxRecorder;
pub use transcription::WhisperClient;
