use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{Oracle, OracleError, OracleReply, OracleRequest};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";
const DEFAULT_TIMEOUT_MS: u64 = 8_000;

/// Endpoint, model and key are injected here, never hardcoded downstream.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: String::new(),
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }
}

impl OracleConfig {
    /// Environment override: TRIAGE_ORACLE_URL, TRIAGE_ORACLE_MODEL,
    /// GEMINI_API_KEY, TRIAGE_ORACLE_TIMEOUT_MS. Missing vars keep defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(url) = std::env::var("TRIAGE_ORACLE_URL") {
            config.base_url = url;
        }
        if let Ok(model) = std::env::var("TRIAGE_ORACLE_MODEL") {
            config.model = model;
        }
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            config.api_key = key;
        }
        if let Ok(ms) = std::env::var("TRIAGE_ORACLE_TIMEOUT_MS") {
            if let Ok(ms) = ms.parse::<u64>() {
                config.timeout = Duration::from_millis(ms);
            }
        }
        config
    }
}

/// HTTP client for the generative-language endpoint.
///
/// The network timeout is enforced at the client level so no pipeline stage
/// can hang on a silent oracle.
#[derive(Clone)]
pub struct GenerativeClient {
    client: Client,
    config: OracleConfig,
}

impl GenerativeClient {
    pub fn new(config: OracleConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(config.timeout)
                .build()
                .unwrap_or_default(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        )
    }
}

#[async_trait]
impl Oracle for GenerativeClient {
    async fn complete(&self, request: OracleRequest) -> Result<OracleReply, OracleError> {
        let request_id = Uuid::new_v4();
        debug!(%request_id, parts = request.parts.len(), "oracle request");

        let body = json!({
            "contents": [
                {
                    "parts": request.parts.iter().map(|t| json!({ "text": t })).collect::<Vec<_>>()
                }
            ]
        });

        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| OracleError::Unavailable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%request_id, status = status.as_u16(), "oracle rejected request");
            return Err(OracleError::Status(status.as_u16()));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| OracleError::Malformed(e.to_string()))?;

        // The answer nests under candidates[0].content, but some revisions of
        // the upstream API ship it under candidates[0].output.content. Take
        // the first present, any shape.
        let candidate = &payload["candidates"][0];
        let content = if !candidate["content"].is_null() {
            candidate["content"].clone()
        } else if !candidate["output"]["content"].is_null() {
            candidate["output"]["content"].clone()
        } else {
            return Err(OracleError::Ambiguous);
        };

        debug!(%request_id, "oracle reply received");
        Ok(OracleReply { content })
    }
}
