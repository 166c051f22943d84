use chrono::{DateTime, Utc};

use super::transcript::{CaptureEpoch, Speaker};
use crate::capture::CaptureEvent;
use crate::pipeline::state::View;
use crate::records::{CallId, CallRecord, PriorityEntry};
use crate::responders::ResponderKind;

/// Everything that can reach the desk: operator actions, capture fragments,
/// and results of spawned oracle work flowing back in.
#[derive(Debug, Clone)]
pub enum Event {
    Capture(CaptureEvent),
    SetListening(bool),
    EndCall,
    RequestFurtherQuestions,
    MarkDangerous,
    Dispatch { id: CallId },
    SetView(View),
    /// Guidance for a finalized call. Carries the call id it was issued for,
    /// so a late arrival lands on its own record only.
    GuidanceReady {
        id: CallId,
        kind: ResponderKind,
        items: Vec<String>,
    },
    /// Mid-call further questions. Carries the capture epoch it was issued
    /// for; stale epochs are discarded.
    LiveQuestionsReady {
        epoch: CaptureEpoch,
        items: Vec<String>,
    },
}

/// Strict state delta. This is the only way [`super::state::DashboardState`]
/// mutates.
#[derive(Debug, Clone)]
pub enum StateDelta {
    LineAppended { speaker: Speaker, text: String },
    ListeningChanged(bool),
    CallFrozen,
    CallFinalized {
        record: CallRecord,
        entry: PriorityEntry,
        banner: String,
    },
    GuidanceReady {
        id: CallId,
        kind: ResponderKind,
        items: Vec<String>,
    },
    LiveQuestionsReady {
        epoch: CaptureEpoch,
        items: Vec<String>,
    },
    ManualDangerMark,
    Dispatched { id: CallId, at: DateTime<Utc> },
    ViewChanged(View),
}
