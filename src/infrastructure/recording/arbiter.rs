//! First-completed-wins stop arbiter for the recording session

use tokio_util::sync::CancellationToken;

use crate::application::ports::RecordingError;

use super::keys::StopKeyListener;

/// Which stop source fired first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// OS-level interrupt/terminate signal
    Signal,
    /// The designated stop key was pressed
    StopKey,
    /// The caller's cancellation token fired
    Cancelled,
}

impl StopReason {
    pub fn describe(&self) -> &'static str {
        match self {
            StopReason::Signal => "Received interrupt signal",
            StopReason::StopKey => "Stop key pressed",
            StopReason::Cancelled => "Cancelled by caller",
        }
    }
}

/// Block until the first of three stop sources fires: an OS signal, the stop
/// key, or the caller's cancellation token.
///
/// The losing sources are simply dropped; they cannot block shutdown or fire
/// a second stop. Signal registrations are released when their streams drop,
/// which happens on every exit path of this function.
pub async fn wait_for_stop(
    cancel: &CancellationToken,
    keys: Option<&mut StopKeyListener>,
) -> Result<StopReason, RecordingError> {
    let key_pressed = async {
        match keys {
            Some(listener) => listener.recv().await,
            None => std::future::pending().await,
        }
    };

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigint = signal(SignalKind::interrupt())
            .map_err(|e| RecordingError::SignalSetup(e.to_string()))?;
        let mut sigterm = signal(SignalKind::terminate())
            .map_err(|e| RecordingError::SignalSetup(e.to_string()))?;

        tokio::select! {
            _ = sigint.recv() => Ok(StopReason::Signal),
            _ = sigterm.recv() => Ok(StopReason::Signal),
            _ = key_pressed => Ok(StopReason::StopKey),
            _ = cancel.cancelled() => Ok(StopReason::Cancelled),
        }
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                result.map_err(|e| RecordingError::SignalSetup(e.to_string()))?;
                Ok(StopReason::Signal)
            }
            _ = key_pressed => Ok(StopReason::StopKey),
            _ = cancel.cancelled() => Ok(StopReason::Cancelled),
        }
    }
}
