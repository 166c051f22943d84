//! The dashboard aggregate: one owner for the live buffer, the list stores,
//! the dispatch map, and per-call guidance.
//!
//! State mutates only through [`DashboardState::reduce`]; the async desk
//! decides *what* to apply, this module decides *how*.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::event::StateDelta;
use super::transcript::TranscriptBuffer;
use crate::classify::UrgencyLevel;
use crate::records::{CallId, CallRecord, PriorityEntry};
use crate::responders::ResponderKind;
use crate::stores::{BoundedList, DispatchTracker, Snapshot};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum View {
    #[default]
    Priority,
    History,
    Live,
}

/// Lifecycle of the live buffer. Finalization returns to `Capturing` for the
/// next call; dispatch and completion are tracked per record, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallPhase {
    Capturing,
    Ending,
}

/// Level filter for the priority view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelFilter {
    All,
    Only(UrgencyLevel),
}

impl LevelFilter {
    fn admits(&self, level: UrgencyLevel) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::Only(wanted) => level == *wanted,
        }
    }
}

/// Oracle guidance attached to one finalized call.
#[derive(Debug, Clone, Default)]
pub struct GuidanceBoard {
    pub comforting: Vec<String>,
    pub details: Vec<String>,
}

#[derive(Debug)]
pub struct DashboardState {
    pub live: TranscriptBuffer,
    pub listening: bool,
    pub phase: CallPhase,
    /// Status line shown over the live view ("AI Analysis: ..." or the
    /// manual override).
    pub banner: Option<String>,
    /// Mid-call further questions for the current capture.
    pub live_questions: Vec<String>,
    pub priority: BoundedList<PriorityEntry>,
    pub calls: BoundedList<CallRecord>,
    guidance: HashMap<CallId, GuidanceBoard>,
    pub dispatch: DispatchTracker,
    pub view: View,
}

impl Default for DashboardState {
    fn default() -> Self {
        Self {
            live: TranscriptBuffer::new(),
            listening: false,
            phase: CallPhase::Capturing,
            banner: None,
            live_questions: Vec::new(),
            priority: BoundedList::default(),
            calls: BoundedList::default(),
            guidance: HashMap::new(),
            dispatch: DispatchTracker::new(),
            view: View::default(),
        }
    }
}

impl DashboardState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cap(cap: usize) -> Self {
        Self {
            priority: BoundedList::new(cap),
            calls: BoundedList::new(cap),
            ..Self::default()
        }
    }

    pub fn guidance(&self, id: &CallId) -> Option<&GuidanceBoard> {
        self.guidance.get(id)
    }

    /// Pure reduction: State + Delta -> mutated State.
    pub fn reduce(&mut self, delta: StateDelta) {
        match delta {
            StateDelta::LineAppended { speaker, text } => {
                // The buffer accepts appends only while capturing.
                if self.phase == CallPhase::Capturing {
                    self.live.append(speaker, &text);
                } else {
                    debug!("line dropped, call is ending");
                }
            }
            StateDelta::ListeningChanged(listening) => {
                self.listening = listening;
            }
            StateDelta::CallFrozen => {
                self.phase = CallPhase::Ending;
            }
            StateDelta::CallFinalized {
                record,
                entry,
                banner,
            } => {
                self.calls.push_front(record);
                self.priority.push_front(entry);
                self.prune_guidance();
                self.banner = Some(banner);
                self.live.clear();
                self.live_questions.clear();
                self.phase = CallPhase::Capturing;
            }
            StateDelta::GuidanceReady { id, kind, items } => {
                // Late guidance lands on its own record; evicted ids are gone.
                if !self.calls.iter().any(|call| call.id == id) {
                    debug!(%id, "guidance for evicted call discarded");
                    return;
                }
                let board = self.guidance.entry(id).or_default();
                match kind {
                    ResponderKind::Comforting => board.comforting = items,
                    ResponderKind::ImportantDetails => board.details = items,
                    ResponderKind::FurtherQuestions => {}
                }
            }
            StateDelta::LiveQuestionsReady { epoch, items } => {
                if epoch == self.live.epoch() {
                    self.live_questions = items;
                } else {
                    debug!(?epoch, "stale live questions discarded");
                }
            }
            StateDelta::ManualDangerMark => {
                self.banner = Some("Manually marked as Dangerous".to_string());
            }
            StateDelta::Dispatched { id, at } => {
                self.dispatch.dispatch(&id, at);
            }
            StateDelta::ViewChanged(view) => {
                self.view = view;
            }
        }
    }

    fn prune_guidance(&mut self) {
        self.guidance
            .retain(|id, _| self.calls.iter().any(|call| &call.id == id));
    }

    /// Case-insensitive history search over id and transcript content.
    pub fn search_calls(&self, term: &str) -> Vec<&CallRecord> {
        self.calls.iter().filter(|call| call.matches(term)).collect()
    }

    pub fn filter_priority(&self, filter: LevelFilter) -> Vec<&PriorityEntry> {
        self.priority
            .iter()
            .filter(|entry| filter.admits(entry.level))
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            priority: self.priority.to_vec(),
            calls: self.calls.to_vec(),
            view: self.view,
        }
    }

    pub fn restore(snapshot: Snapshot, cap: usize) -> Self {
        Self {
            priority: BoundedList::from_vec(snapshot.priority, cap),
            calls: BoundedList::from_vec(snapshot.calls, cap),
            view: snapshot.view,
            ..Self::default()
        }
    }
}
