//! Urgency classification for a completed transcript.
//!
//! The oracle rates the call High/Medium/Low. The answer is scanned for the
//! three tokens in priority order, and anything the oracle cannot settle is
//! settled locally by [`fallback`]. `classify` is total: it always lands on
//! exactly one level.

pub mod fallback;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::oracle::{response, Oracle, OracleRequest};

/// Severity scale. Ordering is by severity, High greatest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrgencyLevel::High => write!(f, "High"),
            UrgencyLevel::Medium => write!(f, "Medium"),
            UrgencyLevel::Low => write!(f, "Low"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClassificationSource {
    Oracle,
    LocalFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub level: UrgencyLevel,
    pub source: ClassificationSource,
}

/// Priority-ordered token scan of a free-text answer.
///
/// "high" wins over "medium" wins over "low" regardless of where each token
/// occurs in the text. None when no token is present.
pub fn parse_level(answer: &str) -> Option<UrgencyLevel> {
    let lower = answer.to_lowercase();
    if lower.contains("high") {
        Some(UrgencyLevel::High)
    } else if lower.contains("medium") {
        Some(UrgencyLevel::Medium)
    } else if lower.contains("low") {
        Some(UrgencyLevel::Low)
    } else {
        None
    }
}

pub struct Classifier {
    oracle: Arc<dyn Oracle>,
}

impl Classifier {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self { oracle }
    }

    fn rubric(transcript: &str) -> OracleRequest {
        OracleRequest::parts(vec![
            format!("Transcript:\n{transcript}"),
            "\nRate this transcript high (firearms or death involved), medium \
             (incidents such as vehicle collisions), or low (non-urgent) priority. \
             Reply with one word: high/medium/low"
                .to_string(),
        ])
    }

    /// Total classification. Oracle failure or an answer with no usable token
    /// resolves through the local keyword rule, never an unknown state.
    pub async fn classify(&self, transcript: &str) -> ClassificationResult {
        match self.oracle.complete(Self::rubric(transcript)).await {
            Ok(reply) => {
                let answer = response::flatten_text(&reply.content);
                match parse_level(&answer) {
                    Some(level) => ClassificationResult {
                        level,
                        source: ClassificationSource::Oracle,
                    },
                    None => {
                        warn!("oracle answer had no level token, using local rule");
                        ClassificationResult {
                            level: fallback::classify(transcript),
                            source: ClassificationSource::LocalFallback,
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "oracle classification failed, using local rule");
                ClassificationResult {
                    level: fallback::classify(transcript),
                    source: ClassificationSource::LocalFallback,
                }
            }
        }
    }
}
