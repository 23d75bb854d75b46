//! The five concrete pipeline stages

use std::time::Duration;

use async_trait::async_trait;
use tokio::fs;
use tokio_util::sync::CancellationToken;

use crate::domain::PipelineState;

use super::pipeline::{Stage, StageError};
use super::ports::{Recorder, Transcriber, TranscriptEditor};

/// Upper bound on a single transcription call, narrower than any
/// caller-supplied deadline
pub const TRANSCRIBE_TIMEOUT: Duration = Duration::from_secs(120);

/// Records audio into the run's output folder
pub struct RecordStage<R: Recorder> {
    recorder: R,
    output_file: Option<String>,
}

impl<R: Recorder> RecordStage<R> {
    pub fn new(recorder: R, output_file: Option<String>) -> Self {
        Self {
            recorder,
            output_file,
        }
    }
}

#[async_trait]
impl<R: Recorder> Stage for RecordStage<R> {
    fn name(&self) -> &'static str {
        "record"
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        state: &mut PipelineState,
    ) -> Result<(), StageError> {
        fs::create_dir_all(state.out_folder())
            .await
            .map_err(|e| StageError::CreateFolder {
                path: state.out_folder().display().to_string(),
                detail: e.to_string(),
            })?;

        let output_file = match &self.output_file {
            Some(name) if !name.is_empty() => name.clone(),
            _ => format!("recording_{}.wav", state.timestamp()),
        };
        state.set_output_file(output_file);

        let path = state.audio_path()?;
        self.recorder.record(cancel, &path).await?;

        Ok(())
    }
}

/// Transcribes the recorded audio through the remote transcription client
pub struct TranscribeStage<T: Transcriber> {
    transcriber: T,
}

impl<T: Transcriber> TranscribeStage<T> {
    pub fn new(transcriber: T) -> Self {
        Self { transcriber }
    }
}

#[async_trait]
impl<T: Transcriber> Stage for TranscribeStage<T> {
    fn name(&self) -> &'static str {
        "transcribe"
    }

    async fn execute(
        &self,
        cancel: &CancellationToken,
        state: &mut PipelineState,
    ) -> Result<(), StageError> {
        let path = state.audio_path()?;

        let text = tokio::time::timeout(TRANSCRIBE_TIMEOUT, self.transcriber.transcribe(cancel, &path))
            .await
            .map_err(|_| StageError::Timeout(TRANSCRIBE_TIMEOUT.as_secs()))??;

        state.set_transcription(text);
        Ok(())
    }
}

/// Cleans up the transcript and summarizes it
pub struct EditStage<E: TranscriptEditor> {
    editor: E,
}

impl<E: TranscriptEditor> EditStage<E> {
    pub fn new(editor: E) -> Self {
        Self { editor }
    }
}

#[async_trait]
impl<E: TranscriptEditor> Stage for EditStage<E> {
    fn name(&self) -> &'static str {
        "edit"
    }

    async fn execute(
        &self,
        _cancel: &CancellationToken,
        state: &mut PipelineState,
    ) -> Result<(), StageError> {
        let transcript = state.require_transcription()?.to_string();
        let edited = self.editor.edit_and_summarize(&transcript).await?;

        state.set_cleaned_transcription(edited.cleaned_transcription);
        state.set_summary(edited.summary);
        Ok(())
    }
}

/// Writes the three transcript files next to the recording
pub struct SaveStage;

#[async_trait]
impl Stage for SaveStage {
    fn name(&self) -> &'static str {
        "save"
    }

    async fn execute(
        &self,
        _cancel: &CancellationToken,
        state: &mut PipelineState,
    ) -> Result<(), StageError> {
        let timestamp = state.timestamp().to_string();
        let files = [
            (
                format!("transcription_{}.txt", timestamp),
                state.require_transcription()?.to_string(),
            ),
            (
                format!("cleaned_transcription_{}.txt", timestamp),
                state.require_cleaned_transcription()?.to_string(),
            ),
            (
                format!("summary_{}.txt", timestamp),
                state.require_summary()?.to_string(),
            ),
        ];

        for (file_name, content) in files {
            let path = state.out_folder().join(&file_name);
            fs::write(&path, content)
                .await
                .map_err(|e| StageError::Save {
                    path: path.display().to_string(),
                    detail: e.to_string(),
                })?;
        }

        println!(
            "Cleaned Transcription:\n{}\n",
            state.require_cleaned_transcription()?
        );
        println!("Summary:\n{}", state.require_summary()?);

        Ok(())
    }
}

/// Generates a headline from the summary and renames the output folder
pub struct HeadlineStage<E: TranscriptEditor> {
    editor: E,
}

impl<E: TranscriptEditor> HeadlineStage<E> {
    pub fn new(editor: E) -> Self {
        Self { editor }
    }
}

#[async_trait]
impl<E: TranscriptEditor> Stage for HeadlineStage<E> {
    fn name(&self) -> &'static str {
        "headline"
    }

    async fn execute(
        &self,
        _cancel: &CancellationToken,
        state: &mut PipelineState,
    ) -> Result<(), StageError> {
        let summary = state.require_summary()?.to_string();
        let headline = self.editor.create_headline(&summary).await?;

        let parent = state
            .out_folder()
            .parent()
            .map(std::path::Path::to_path_buf)
            .unwrap_or_else(|| std::path::PathBuf::from("."));
        let renamed = parent.join(format!("{}_{}", state.timestamp(), headline));

        fs::rename(state.out_folder(), &renamed)
            .await
            .map_err(|e| StageError::Rename {
                to: renamed.display().to_string(),
                detail: e.to_string(),
            })?;

        state.set_headline(headline.as_str(), renamed);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{
        EditedTranscript, EditorError, RecordingError, TranscriptionError,
    };
    use crate::domain::Headline;
    use std::path::Path;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    struct MockRecorder {
        recorded_to: Arc<Mutex<Option<String>>>,
    }

    #[async_trait]
    impl Recorder for MockRecorder {
        async fn record(
            &self,
            _cancel: &CancellationToken,
            output_path: &Path,
        ) -> Result<(), RecordingError> {
            *self.recorded_to.lock().unwrap() = Some(output_path.display().to_string());
            Ok(())
        }
    }

    struct MockTranscriber;

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(
            &self,
            _cancel: &CancellationToken,
            _audio_path: &Path,
        ) -> Result<String, TranscriptionError> {
            Ok("hello world".to_string())
        }
    }

    struct MockEditor {
        headline_calls: Arc<AtomicUsize>,
    }

    impl MockEditor {
        fn new() -> Self {
            Self {
                headline_calls: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait]
    impl TranscriptEditor for MockEditor {
        async fn edit_and_summarize(
            &self,
            transcript: &str,
        ) -> Result<EditedTranscript, EditorError> {
            Ok(EditedTranscript {
                cleaned_transcription: format!("cleaned: {}", transcript),
                summary: "- a summary".to_string(),
            })
        }

        async fn create_headline(&self, _summary: &str) -> Result<Headline, EditorError> {
            self.headline_calls.fetch_add(1, Ordering::SeqCst);
            Ok(Headline::parse("Voice Note").map_err(EditorError::UnusableHeadline)?)
        }
    }

    #[tokio::test]
    async fn record_stage_defaults_output_file_to_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let recorded_to = Arc::new(Mutex::new(None));
        let stage = RecordStage::new(
            MockRecorder {
                recorded_to: Arc::clone(&recorded_to),
            },
            None,
        );

        let mut state = PipelineState::new("20240101_120000", dir.path().join("20240101_120000"));
        let cancel = CancellationToken::new();
        stage.execute(&cancel, &mut state).await.unwrap();

        assert_eq!(
            state.require_output_file().unwrap(),
            "recording_20240101_120000.wav"
        );
        assert!(recorded_to
            .lock()
            .unwrap()
            .as_ref()
            .unwrap()
            .ends_with("recording_20240101_120000.wav"));
        assert!(state.out_folder().is_dir());
    }

    #[tokio::test]
    async fn record_stage_honors_explicit_output_file() {
        let dir = tempfile::tempdir().unwrap();
        let stage = RecordStage::new(
            MockRecorder {
                recorded_to: Arc::new(Mutex::new(None)),
            },
            Some("note.wav".to_string()),
        );

        let mut state = PipelineState::new("ts", dir.path().join("ts"));
        let cancel = CancellationToken::new();
        stage.execute(&cancel, &mut state).await.unwrap();

        assert_eq!(state.require_output_file().unwrap(), "note.wav");
    }

    #[tokio::test]
    async fn transcribe_stage_requires_output_file() {
        let stage = TranscribeStage::new(MockTranscriber);
        let mut state = PipelineState::new("ts", "./recordings/ts");
        let cancel = CancellationToken::new();

        let err = stage.execute(&cancel, &mut state).await.unwrap_err();
        assert!(matches!(err, StageError::MissingField(_)));
    }

    #[tokio::test]
    async fn transcribe_stage_stores_transcription() {
        let stage = TranscribeStage::new(MockTranscriber);
        let mut state = PipelineState::new("ts", "./recordings/ts");
        state.set_output_file("recording_ts.wav");
        let cancel = CancellationToken::new();

        stage.execute(&cancel, &mut state).await.unwrap();
        assert_eq!(state.require_transcription().unwrap(), "hello world");
    }

    #[tokio::test]
    async fn edit_stage_requires_transcription() {
        let stage = EditStage::new(MockEditor::new());
        let mut state = PipelineState::new("ts", "./recordings/ts");
        let cancel = CancellationToken::new();

        let err = stage.execute(&cancel, &mut state).await.unwrap_err();
        assert!(matches!(err, StageError::MissingField(_)));
    }

    #[tokio::test]
    async fn save_stage_writes_three_files() {
        let dir = tempfile::tempdir().unwrap();
        let out_folder = dir.path().join("ts");
        tokio::fs::create_dir_all(&out_folder).await.unwrap();

        let mut state = PipelineState::new("ts", &out_folder);
        state.set_transcription("raw");
        state.set_cleaned_transcription("cleaned");
        state.set_summary("- summary");

        let cancel = CancellationToken::new();
        SaveStage.execute(&cancel, &mut state).await.unwrap();

        for name in [
            "transcription_ts.txt",
            "cleaned_transcription_ts.txt",
            "summary_ts.txt",
        ] {
            let content = std::fs::read_to_string(out_folder.join(name)).unwrap();
            assert!(!content.is_empty(), "{} is empty", name);
        }
    }

    #[tokio::test]
    async fn headline_stage_renames_folder_and_updates_state() {
        let dir = tempfile::tempdir().unwrap();
        let out_folder = dir.path().join("ts");
        tokio::fs::create_dir_all(&out_folder).await.unwrap();

        let mut state = PipelineState::new("ts", &out_folder);
        state.set_summary("- summary");

        let editor = MockEditor::new();
        let calls = Arc::clone(&editor.headline_calls);
        let stage = HeadlineStage::new(editor);

        let cancel = CancellationToken::new();
        stage.execute(&cancel, &mut state).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(state.headline(), "Voice_Note");
        assert!(!out_folder.exists());
        assert!(dir.path().join("ts_Voice_Note").is_dir());
        assert_eq!(state.out_folder(), dir.path().join("ts_Voice_Note"));
    }
}
