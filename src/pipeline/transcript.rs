//! The in-progress call's line buffer.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Speaker {
    Caller,
    Operator,
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Speaker::Caller => write!(f, "Caller"),
            Speaker::Operator => write!(f, "Operator"),
        }
    }
}

/// Monotonic capture generation. Incremented every time the buffer is
/// cleared, so a late oracle response can be matched against the capture it
/// was issued for and discarded when stale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureEpoch(pub u64);

/// Ordered, append-only line sequence for the call currently being captured.
/// Order is chronological; lines are never rewritten, only appended.
#[derive(Debug, Default)]
pub struct TranscriptBuffer {
    lines: Vec<String>,
    epoch: CaptureEpoch,
}

impl TranscriptBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, speaker: Speaker, fragment: &str) {
        self.lines.push(format!("{speaker}: {fragment}"));
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn epoch(&self) -> CaptureEpoch {
        self.epoch
    }

    /// Copy of the current line sequence. MUST be taken before any oracle
    /// call is issued, so concurrent appends cannot race with the prompt.
    pub fn freeze(&self) -> FrozenTranscript {
        FrozenTranscript {
            lines: self.lines.clone(),
            epoch: self.epoch,
        }
    }

    /// Resets for the next call and advances the epoch, invalidating any
    /// in-flight work tied to the previous capture.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.epoch = CaptureEpoch(self.epoch.0 + 1);
    }
}

/// An immutable copy of the buffer at freeze time.
#[derive(Debug, Clone)]
pub struct FrozenTranscript {
    pub lines: Vec<String>,
    pub epoch: CaptureEpoch,
}

impl FrozenTranscript {
    /// Canonical prompt text: lines joined with a newline.
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }
}
