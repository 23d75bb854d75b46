//! Full pipeline integration tests with mocked remote endpoints

use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use voice_scribe::application::ports::{Recorder, RecordingError, Transcriber, TranscriptionError};
use voice_scribe::application::{
    EditStage, HeadlineStage, Pipeline, PipelineCallbacks, RecordStage, SaveStage, Stage,
    StageError, TranscribeStage,
};
use voice_scribe::domain::PipelineState;
use voice_scribe::infrastructure::{AiEditor, WhisperClient};

/// Minimal but well-formed RIFF/WAVE file
fn wav_fixture() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&36u32.to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&[0u8; 16]);
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes
}

/// Recorder that writes a fixture WAV instead of running sox
struct FixtureRecorder;

#[async_trait]
impl Recorder for FixtureRecorder {
    async fn record(
        &self,
        _cancel: &CancellationToken,
        output_path: &Path,
    ) -> Result<(), RecordingError> {
        tokio::fs::write(output_path, wav_fixture())
            .await
            .map_err(|e| RecordingError::SpawnFailed(e.to_string()))
    }
}

struct FailingTranscriber;

#[async_trait]
impl Transcriber for FailingTranscriber {
    async fn transcribe(
        &self,
        _cancel: &CancellationToken,
        _audio_path: &Path,
    ) -> Result<String, TranscriptionError> {
        Err(TranscriptionError::Transport("connection refused".into()))
    }
}

struct CountingStage {
    name: &'static str,
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Stage for CountingStage {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn execute(
        &self,
        _cancel: &CancellationToken,
        _state: &mut PipelineState,
    ) -> Result<(), StageError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

async fn mount_remote_endpoints(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"text": "hello world"})),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("Clean up the transcription"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content":
                "{\"cleaned_transcription\": \"Hello, world.\", \"summary\": \"- A greeting\"}"
            }}]
        })))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_string_contains("catchy headline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{"message": {"content": "{\"headline\": \"Friendly Greeting\"}"}}]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn full_pipeline_produces_a_renamed_folder_with_four_files() {
    let server = MockServer::start().await;
    mount_remote_endpoints(&server).await;

    let recordings = TempDir::new().unwrap();
    let timestamp = "20240101_120000";
    let mut state = PipelineState::new(timestamp, recordings.path().join(timestamp));

    let editor = AiEditor::new(format!("{}/v1/chat/completions", server.uri()), "test-key");
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(RecordStage::new(FixtureRecorder, None)),
        Box::new(TranscribeStage::new(WhisperClient::new(
            format!("{}/v1/audio/transcriptions", server.uri()),
            "test-key",
        ))),
        Box::new(EditStage::new(editor.clone())),
        Box::new(SaveStage),
        Box::new(HeadlineStage::new(editor)),
    ];

    let pipeline = Pipeline::new(stages);
    let cancel = CancellationToken::new();
    pipeline
        .run(&cancel, &mut state, &PipelineCallbacks::default())
        .await
        .unwrap();

    let final_folder = recordings.path().join("20240101_120000_Friendly_Greeting");
    assert!(final_folder.is_dir(), "renamed folder missing");
    assert_eq!(state.out_folder(), final_folder);
    assert!(!recordings.path().join(timestamp).exists());

    for name in [
        "transcription_20240101_120000.txt",
        "cleaned_transcription_20240101_120000.txt",
        "summary_20240101_120000.txt",
    ] {
        let content = std::fs::read_to_string(final_folder.join(name)).unwrap();
        assert!(!content.is_empty(), "{} is empty", name);
    }
    assert!(final_folder.join("recording_20240101_120000.wav").is_file());

    assert_eq!(state.require_transcription().unwrap(), "hello world");
    assert_eq!(state.headline(), "Friendly_Greeting");
}

#[tokio::test]
async fn transcribe_failure_skips_all_later_stages() {
    let recordings = TempDir::new().unwrap();
    let timestamp = "20240101_130000";
    let mut state = PipelineState::new(timestamp, recordings.path().join(timestamp));

    let later_runs = Arc::new(AtomicUsize::new(0));
    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(RecordStage::new(FixtureRecorder, None)),
        Box::new(TranscribeStage::new(FailingTranscriber)),
        Box::new(CountingStage {
            name: "edit",
            runs: Arc::clone(&later_runs),
        }),
        Box::new(CountingStage {
            name: "save",
            runs: Arc::clone(&later_runs),
        }),
        Box::new(CountingStage {
            name: "headline",
            runs: Arc::clone(&later_runs),
        }),
    ];

    let pipeline = Pipeline::new(stages);
    let cancel = CancellationToken::new();
    let err = pipeline
        .run(&cancel, &mut state, &PipelineCallbacks::default())
        .await
        .unwrap_err();

    assert_eq!(err.stage, "transcribe");
    assert_eq!(later_runs.load(Ordering::SeqCst), 0);

    // the completed record stage's artifact is left in place
    assert!(recordings
        .path()
        .join(timestamp)
        .join("recording_20240101_130000.wav")
        .is_file());
}

#[tokio::test]
async fn pipeline_error_message_names_stage_and_cause() {
    let recordings = TempDir::new().unwrap();
    let mut state = PipelineState::new("ts", recordings.path().join("ts"));

    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(RecordStage::new(FixtureRecorder, None)),
        Box::new(TranscribeStage::new(FailingTranscriber)),
    ];

    let pipeline = Pipeline::new(stages);
    let cancel = CancellationToken::new();
    let err = pipeline
        .run(&cancel, &mut state, &PipelineCallbacks::default())
        .await
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("transcribe"), "got: {}", message);
    let cause = std::error::Error::source(&err).map(ToString::to_string);
    assert!(
        cause.unwrap_or_default().contains("connection refused"),
        "cause should carry the underlying failure"
    );
}
