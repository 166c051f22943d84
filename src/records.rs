//! Records produced by the intake pipeline and rendered by the views.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::classify::UrgencyLevel;

/// Session-unique call identifier, e.g. `2025-05-24-004`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallId(pub String);

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl CallId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Synthetic queue wait used purely for display simulation, not a real ETA.
/// Generated once at creation, never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitTime {
    pub minutes: u64,
}

impl WaitTime {
    pub const MIN_MINUTES: u64 = 1;
    pub const MAX_MINUTES: u64 = 10;

    /// Bounded pseudo-random duration in [1, 10] minutes. The v4 id bytes are
    /// the entropy source; the crate carries no dedicated RNG.
    pub fn synthetic() -> Self {
        let span = Self::MAX_MINUTES - Self::MIN_MINUTES + 1;
        Self {
            minutes: Self::MIN_MINUTES + (Uuid::new_v4().as_u128() % span as u128) as u64,
        }
    }

    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.minutes * 60)
    }
}

impl fmt::Display for WaitTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} min", self.minutes)
    }
}

/// A completed call. Immutable once stored; the transcript holds the captured
/// lines plus the appended analysis annotation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRecord {
    pub id: CallId,
    pub transcript: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CallRecord {
    /// Case-insensitive match on id substring or any transcript line.
    pub fn matches(&self, term: &str) -> bool {
        if term.is_empty() {
            return true;
        }
        let needle = term.to_lowercase();
        self.id.as_str().to_lowercase().contains(&needle)
            || self
                .transcript
                .iter()
                .any(|line| line.to_lowercase().contains(&needle))
    }
}

/// Queue entry derived from a finalized call. `id` references exactly one
/// [`CallRecord`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityEntry {
    pub id: CallId,
    pub level: UrgencyLevel,
    pub wait: WaitTime,
}
