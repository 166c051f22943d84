//! One-shot guidance generators: comforting questions, important details,
//! further questions.
//!
//! All three share one contract: submit the frozen transcript with a distinct
//! instruction, parse the free-text answer into discrete items, and on ANY
//! failure return an empty list. Guidance is optional; it must never block or
//! fail call completion.

pub mod parse;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::oracle::{Oracle, OracleRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResponderKind {
    Comforting,
    ImportantDetails,
    FurtherQuestions,
}

impl fmt::Display for ResponderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponderKind::Comforting => write!(f, "comforting"),
            ResponderKind::ImportantDetails => write!(f, "important-details"),
            ResponderKind::FurtherQuestions => write!(f, "further-questions"),
        }
    }
}

impl ResponderKind {
    fn request(&self, transcript: &str) -> OracleRequest {
        match self {
            ResponderKind::Comforting => OracleRequest::parts(vec![
                format!("Transcript:\n{transcript}"),
                "\nWhat other helpful questions or comforting questions can I ask?"
                    .to_string(),
            ]),
            ResponderKind::ImportantDetails => OracleRequest::parts(vec![
                "Using the following transcript, return which details are important \
                 for law enforcement (address, name, and what is happening). If there \
                 is nothing important, return an empty space. Do not use formatting \
                 such as asterisks or titles."
                    .to_string(),
                "\nThen, using the transcript provided, add questions as needed to \
                 clarify the situation."
                    .to_string(),
                format!("\nTranscript:\n{transcript}"),
            ]),
            ResponderKind::FurtherQuestions => OracleRequest::parts(vec![
                "Using the following transcript, give me 5 questions I can ask to \
                 make the caller feel better or to ensure their safety."
                    .to_string(),
                format!("\nTranscript:\n{transcript}"),
            ]),
        }
    }
}

#[derive(Clone)]
pub struct Responder {
    oracle: Arc<dyn Oracle>,
    kind: ResponderKind,
}

impl Responder {
    pub fn new(oracle: Arc<dyn Oracle>, kind: ResponderKind) -> Self {
        Self { oracle, kind }
    }

    pub fn kind(&self) -> ResponderKind {
        self.kind
    }

    /// Best effort. Empty transcript or any oracle failure yields an empty
    /// list, never an error.
    pub async fn generate(&self, transcript: &str) -> Vec<String> {
        if transcript.trim().is_empty() {
            return Vec::new();
        }

        match self.oracle.complete(self.kind.request(transcript)).await {
            Ok(reply) => parse::normalize_items(&reply.content),
            Err(e) => {
                warn!(kind = %self.kind, error = %e, "responder request failed");
                Vec::new()
            }
        }
    }
}

/// The three guidance generators over one shared oracle handle.
#[derive(Clone)]
pub struct ResponderSet {
    pub comforting: Responder,
    pub details: Responder,
    pub further: Responder,
}

impl ResponderSet {
    pub fn new(oracle: Arc<dyn Oracle>) -> Self {
        Self {
            comforting: Responder::new(oracle.clone(), ResponderKind::Comforting),
            details: Responder::new(oracle.clone(), ResponderKind::ImportantDetails),
            further: Responder::new(oracle, ResponderKind::FurtherQuestions),
        }
    }
}
