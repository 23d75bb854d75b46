//! Port interfaces for external collaborators

pub mod editor;
pub mod recorder;
pub mod transcriber;

pub use editor::{EditedTranscript, EditorError, TranscriptEditor};
pub use recorder::{Recorder, RecordingError};
pub use transcriber::{Transcriber, TranscriptionError};
