//! Stop-key listener for interactive recording

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use futures::StreamExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::application::ports::RecordingError;

/// Whether a terminal event is one of the designated stop keys.
/// Ctrl+C is included because raw mode swallows the terminal's SIGINT.
fn is_stop_key(event: &Event) -> bool {
    let Event::Key(KeyEvent {
        code,
        modifiers,
        kind: KeyEventKind::Press,
        ..
    }) = event
    else {
        return false;
    };

    match code {
        KeyCode::Esc => true,
        KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Listener task that signals once when a stop key is pressed.
///
/// Spawning puts the terminal in raw mode; dropping the listener aborts the
/// task and restores the terminal, so teardown happens on every exit path.
pub struct StopKeyListener {
    rx: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl StopKeyListener {
    pub fn spawn() -> Result<Self, RecordingError> {
        terminal::enable_raw_mode().map_err(|e| RecordingError::KeyListener(e.to_string()))?;

        let (tx, rx) = mpsc::channel(1);
        let task = tokio::spawn(async move {
            let mut events = EventStream::new();
            while let Some(event) = events.next().await {
                match event {
                    Ok(ev) if is_stop_key(&ev) => {
                        let _ = tx.send(()).await;
                        break;
                    }
                    Ok(_) => {}
                    Err(_) => break,
                }
            }
        });

        Ok(Self { rx, task })
    }

    /// Wait for the stop key. Pends forever if the listener task died without
    /// signalling, so a broken listener never counts as a stop request.
    pub async fn recv(&mut self) {
        match self.rx.recv().await {
            Some(()) => {}
            None => std::future::pending::<()>().await,
        }
    }
}

impl Drop for StopKeyListener {
    fn drop(&mut self) {
        self.task.abort();
        let _ = terminal::disable_raw_mode();
    }
}
