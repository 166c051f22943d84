//! The external generative-text service the pipeline consults.
//!
//! # INVARIANT
//! No error from this boundary may stop the pipeline. Every caller owns its
//! own recovery: the classifier falls back to keyword rules, the responders
//! return empty lists.

pub mod client;
pub mod response;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OracleError {
    #[error("oracle unreachable: {0}")]
    Unavailable(String),

    #[error("oracle returned status {0}")]
    Status(u16),

    #[error("oracle response malformed: {0}")]
    Malformed(String),

    #[error("oracle answer contained no usable content")]
    Ambiguous,
}

/// One prompt, sent as an ordered list of text parts.
#[derive(Debug, Clone)]
pub struct OracleRequest {
    pub parts: Vec<String>,
}

impl OracleRequest {
    pub fn parts(parts: Vec<String>) -> Self {
        Self { parts }
    }
}

/// The first candidate's content, kept as loose JSON.
///
/// The upstream response shape is unstable (plain string, array, structured
/// parts). Interpretation is deferred to [`response`].
#[derive(Debug, Clone)]
pub struct OracleReply {
    pub content: Value,
}

#[async_trait]
pub trait Oracle: Send + Sync {
    async fn complete(&self, request: OracleRequest) -> Result<OracleReply, OracleError>;
}
