//! Main app runner

use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use chrono::Local;
use tokio_util::sync::CancellationToken;

use crate::application::{
    EditStage, HeadlineStage, Pipeline, PipelineCallbacks, RecordStage, SaveStage, Stage,
    TranscribeStage,
};
use crate::domain::{AppConfig, PipelineState};
use crate::infrastructure::{AiEditor, SoxRecorder, WhisperClient};

use super::args::RunOptions;
use super::presenter::Presenter;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;

/// Timestamp naming everything produced by one run
pub fn run_timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Run the full record-transcribe-edit-save-headline pipeline
pub async fn run_pipeline(options: RunOptions) -> ExitCode {
    let presenter = Arc::new(Mutex::new(Presenter::new()));

    // Configuration failures abort before any stage runs
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Ok(p) = presenter.lock() {
                p.error(&e.to_string());
            }
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let timestamp = run_timestamp();
    let mut state = PipelineState::new(&timestamp, config.recordings_dir.join(&timestamp));

    let editor = AiEditor::new(config.chat_endpoint.as_str(), config.api_key.as_str());
    let transcriber = WhisperClient::new(
        config.transcription_endpoint.as_str(),
        config.api_key.as_str(),
    );

    let stages: Vec<Box<dyn Stage>> = vec![
        Box::new(RecordStage::new(SoxRecorder::new(), options.output)),
        Box::new(TranscribeStage::new(transcriber)),
        Box::new(EditStage::new(editor.clone())),
        Box::new(SaveStage),
        Box::new(HeadlineStage::new(editor)),
    ];
    let pipeline = Pipeline::new(stages);

    let start_presenter = Arc::clone(&presenter);
    let end_presenter = Arc::clone(&presenter);
    let callbacks = PipelineCallbacks {
        on_stage_start: Some(Box::new(move |stage| {
            if let Ok(mut p) = start_presenter.lock() {
                match stage {
                    "transcribe" => p.start_spinner("Transcribing..."),
                    "edit" => p.start_spinner("Cleaning up and summarizing..."),
                    "headline" => p.start_spinner("Generating headline..."),
                    _ => {}
                }
            }
        })),
        on_stage_end: Some(Box::new(move |stage| {
            if let Ok(mut p) = end_presenter.lock() {
                match stage {
                    "transcribe" => p.spinner_success("Transcription complete"),
                    "edit" => p.spinner_success("Transcript cleaned and summarized"),
                    "headline" => p.spinner_success("Headline ready"),
                    _ => {}
                }
            }
        })),
    };

    let cancel = CancellationToken::new();
    match pipeline.run(&cancel, &mut state, &callbacks).await {
        Ok(()) => {
            if let Ok(p) = presenter.lock() {
                p.success(&format!(
                    "Results saved in {}",
                    state.out_folder().display()
                ));
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            if let Ok(mut p) = presenter.lock() {
                p.spinner_fail("Pipeline aborted");
                p.error(&e.to_string());
            }
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_timestamp_has_the_expected_shape() {
        let ts = run_timestamp();
        // 20240101_120000
        assert_eq!(ts.len(), 15);
        assert_eq!(ts.as_bytes()[8], b'_');
        assert!(ts
            .chars()
            .all(|c| c.is_ascii_digit() || c == '_'));
    }
}
