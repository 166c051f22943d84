//! Local keyword rule used when the oracle is unavailable or ambiguous.
//!
//! # INVARIANT
//! Deterministic and total: every input, including the empty string, lands on
//! exactly one level. High patterns are checked before medium patterns; Low
//! is the default.

use super::UrgencyLevel;

const HIGH_PATTERNS: &[&str] = &["fire", "smoke", "shots", "gun", "shooting", "firearm"];

const MEDIUM_PATTERNS: &[&str] = &[
    "fight",
    "missing",
    "accident",
    "burglary",
    "altercation",
    "collision",
    "break-in",
];

pub fn classify(transcript: &str) -> UrgencyLevel {
    let lower = transcript.to_lowercase();
    if HIGH_PATTERNS.iter().any(|p| lower.contains(p)) {
        UrgencyLevel::High
    } else if MEDIUM_PATTERNS.iter().any(|p| lower.contains(p)) {
        UrgencyLevel::Medium
    } else {
        UrgencyLevel::Low
    }
}
