//! sox-based external process recorder adapter

use std::path::Path;
use std::process::Stdio;

use async_trait::async_trait;
use colored::Colorize;
use tokio::process::{Child, Command};
use tokio_util::sync::CancellationToken;

use crate::application::ports::{Recorder, RecordingError};

use super::arbiter;
use super::keys::StopKeyListener;

/// Recorder that captures microphone audio by running `sox` as a child
/// process and stopping it on the first stop trigger.
pub struct SoxRecorder {
    program: String,
    format: String,
}

impl SoxRecorder {
    pub fn new() -> Self {
        Self {
            program: "sox".to_string(),
            format: "wav".to_string(),
        }
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: format.into(),
            ..Self::new()
        }
    }

    /// Substitute the capture program (tests point this at a stand-in)
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Self::new()
        }
    }

    /// Build the capture command. `-d` records from the default input device.
    fn build_command(&self, output_path: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        if cfg!(windows) {
            cmd.args(["-d", "-t", "waveaudio"]);
        } else {
            cmd.args(["-d", "-t", &self.format]);
        }
        cmd.arg(output_path);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);
        cmd
    }

    fn spawn(&self, output_path: &Path) -> Result<Child, RecordingError> {
        self.build_command(output_path).spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                RecordingError::RecorderNotFound(self.program.clone())
            } else {
                RecordingError::SpawnFailed(e.to_string())
            }
        })
    }
}

impl Default for SoxRecorder {
    fn default() -> Self {
        Self::new()
    }
}

/// Names every key the listener accepts; keep in sync with the key set
const STOP_HINT: &str = "Recording... press Esc, q, or Ctrl+C to stop";

/// Ask the child to stop. On Unix this is SIGINT so sox can flush and
/// finalize the WAV header; elsewhere it is a forced kill.
#[cfg(unix)]
fn stop_child(child: &mut Child) -> Result<(), RecordingError> {
    use nix::sys::signal::{self, Signal};
    use nix::unistd::Pid;

    match child.id() {
        Some(id) => signal::kill(Pid::from_raw(id as i32), Signal::SIGINT)
            .map_err(|e| RecordingError::StopFailed(e.to_string())),
        // already exited
        None => Ok(()),
    }
}

#[cfg(not(unix))]
fn stop_child(child: &mut Child) -> Result<(), RecordingError> {
    child
        .start_kill()
        .map_err(|e| RecordingError::StopFailed(e.to_string()))
}

/// Whether an exit status is the expected outcome of a requested stop.
/// An interrupted sox either dies by signal or exits 1/2 after finalizing
/// the file; neither is an abnormal exit.
#[cfg(unix)]
fn expected_stop_exit(status: &std::process::ExitStatus) -> bool {
    use std::os::unix::process::ExitStatusExt;
    status.success() || status.signal().is_some() || matches!(status.code(), Some(1) | Some(2))
}

#[cfg(not(unix))]
fn expected_stop_exit(_status: &std::process::ExitStatus) -> bool {
    // after a forced kill, any exit status is the expected stop outcome
    true
}

#[async_trait]
impl Recorder for SoxRecorder {
    async fn record(
        &self,
        cancel: &CancellationToken,
        output_path: &Path,
    ) -> Result<(), RecordingError> {
        let mut child = self.spawn(output_path)?;

        eprintln!("{} {}", "●".red(), STOP_HINT);

        // A broken key listener degrades to signal/cancellation stops only
        let mut keys = match StopKeyListener::spawn() {
            Ok(listener) => Some(listener),
            Err(e) => {
                eprintln!("{} {} (stop with Ctrl+C)", "⚠".yellow(), e);
                None
            }
        };

        let reason = arbiter::wait_for_stop(cancel, keys.as_mut()).await?;

        // Restore the terminal before printing anything else
        drop(keys);
        eprintln!("{} {}, stopping recording...", "↓".cyan(), reason.describe());

        // The process may have already exited on its own; a failed stop
        // command is reported but does not abort the stage.
        if let Err(e) = stop_child(&mut child) {
            eprintln!("{} {}", "⚠".yellow(), e);
        }

        let status = child
            .wait()
            .await
            .map_err(|e| RecordingError::AbnormalExit(e.to_string()))?;

        if !expected_stop_exit(&status) {
            return Err(RecordingError::AbnormalExit(status.to_string()));
        }

        eprintln!("{} Audio captured: {}", "✓".green(), output_path.display());
        Ok(())
    }
}
