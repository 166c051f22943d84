//! Dispatch timestamps and the progress math derived from them.
//!
//! Progress is a pull-based derived value: recomputed from `now` on every
//! observation, never cached. The only stored state is the per-call dispatch
//! timestamp.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::records::{CallId, WaitTime};

#[derive(Debug, Clone, Default)]
pub struct DispatchTracker {
    marks: HashMap<CallId, DateTime<Utc>>,
}

impl DispatchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Idempotent: the first timestamp wins, re-dispatch is a no-op. Unknown
    /// ids are accepted; a mark is terminal and never cleared.
    pub fn dispatch(&mut self, id: &CallId, at: DateTime<Utc>) {
        self.marks.entry(id.clone()).or_insert(at);
    }

    pub fn dispatched_at(&self, id: &CallId) -> Option<DateTime<Utc>> {
        self.marks.get(id).copied()
    }

    pub fn is_dispatched(&self, id: &CallId) -> bool {
        self.marks.contains_key(id)
    }

    /// Percentage in [0, 100]. 0 when not yet dispatched; clamped to exactly
    /// 100 once elapsed time reaches the wait duration.
    pub fn progress(&self, id: &CallId, wait: WaitTime, now: DateTime<Utc>) -> f64 {
        let Some(start) = self.marks.get(id) else {
            return 0.0;
        };
        let elapsed_ms = (now - *start).num_milliseconds().max(0) as f64;
        let total_ms = wait.duration().as_millis() as f64;
        if total_ms <= 0.0 {
            return 100.0;
        }
        (elapsed_ms / total_ms * 100.0).min(100.0)
    }

    /// Derived view state, not stored.
    pub fn is_finished(&self, id: &CallId, wait: WaitTime, now: DateTime<Utc>) -> bool {
        self.progress(id, wait, now) >= 100.0
    }
}
