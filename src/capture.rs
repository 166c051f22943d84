//! Capture source boundary.
//!
//! Real speech recognition is an external collaborator; the pipeline only
//! consumes its event stream. When no engine is available the listening
//! toggle is a no-op and no fragments arrive. A scripted source stands in
//! for live capture in the demo binary and in tests.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::pipeline::event::Event;
use crate::pipeline::transcript::Speaker;

/// What a capture source can deliver. `Ended` and `Failed` both mean "stop
/// listening"; already-captured lines are kept either way.
#[derive(Debug, Clone)]
pub enum CaptureEvent {
    Fragment { speaker: Speaker, text: String },
    Ended,
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct ScriptedLine {
    pub after: Duration,
    pub speaker: Speaker,
    pub text: String,
}

/// Replays a fixed script of recognized-speech fragments with delays, then
/// signals the end of recognition.
#[derive(Debug, Clone)]
pub struct ScriptedCapture {
    script: Vec<ScriptedLine>,
}

impl ScriptedCapture {
    pub fn new(script: Vec<ScriptedLine>) -> Self {
        Self { script }
    }

    /// Caller-only script with a uniform gap between fragments.
    pub fn caller_lines(lines: &[&str], gap: Duration) -> Self {
        Self::new(
            lines
                .iter()
                .map(|text| ScriptedLine {
                    after: gap,
                    speaker: Speaker::Caller,
                    text: text.to_string(),
                })
                .collect(),
        )
    }

    pub fn spawn(self, tx: mpsc::Sender<Event>, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            for line in self.script {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("scripted capture cancelled");
                        return;
                    }
                    _ = tokio::time::sleep(line.after) => {}
                }
                let event = Event::Capture(CaptureEvent::Fragment {
                    speaker: line.speaker,
                    text: line.text,
                });
                if tx.send(event).await.is_err() {
                    return;
                }
            }
            let _ = tx.send(Event::Capture(CaptureEvent::Ended)).await;
        })
    }
}
