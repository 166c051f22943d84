//! Turns a frozen transcript plus classification into stored records.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use super::transcript::FrozenTranscript;
use crate::classify::ClassificationResult;
use crate::records::{CallId, CallRecord, PriorityEntry, WaitTime};

/// Session-unique id source: local-date prefix plus a monotonic counter.
/// Restart reuse is acceptable; the stores are a cache, not a source of
/// truth.
#[derive(Debug)]
pub struct CallIdGenerator {
    counter: AtomicU64,
}

impl CallIdGenerator {
    pub fn new() -> Self {
        Self {
            counter: AtomicU64::new(1),
        }
    }

    pub fn next(&self, at: DateTime<Utc>) -> CallId {
        let n = self.counter.fetch_add(1, Ordering::Relaxed);
        CallId(format!("{}-{:03}", at.format("%Y-%m-%d"), n))
    }
}

impl Default for CallIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Default)]
pub struct CallRecordFactory {
    ids: CallIdGenerator,
}

impl CallRecordFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bundle the frozen lines into a stored record and its queue entry.
    ///
    /// The stored transcript is the original lines plus one appended analysis
    /// annotation; earlier lines are never mutated. The wait time is sampled
    /// once here and never recomputed.
    pub fn finalize(
        &self,
        frozen: FrozenTranscript,
        classification: &ClassificationResult,
        created_at: DateTime<Utc>,
    ) -> (CallRecord, PriorityEntry) {
        let id = self.ids.next(created_at);

        let mut transcript = frozen.lines;
        transcript.push(format!("Analyzed Danger Level: {}", classification.level));

        let record = CallRecord {
            id: id.clone(),
            transcript,
            created_at,
        };
        let entry = PriorityEntry {
            id,
            level: classification.level,
            wait: WaitTime::synthetic(),
        };
        (record, entry)
    }
}
