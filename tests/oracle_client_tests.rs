use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use triage::oracle::client::{GenerativeClient, OracleConfig};
use triage::oracle::{response, Oracle, OracleError, OracleRequest};

fn config_for(server: &MockServer) -> OracleConfig {
    OracleConfig {
        base_url: server.uri(),
        model: "test-model".to_string(),
        api_key: "test-key".to_string(),
        timeout: Duration::from_millis(500),
    }
}

fn request() -> OracleRequest {
    OracleRequest::parts(vec!["Transcript:\nCaller: help".to_string()])
}

#[tokio::test]
async fn extracts_first_candidate_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/test-model:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [ { "text": "high" } ] } }
            ]
        })))
        .mount(&server)
        .await;

    let client = GenerativeClient::new(config_for(&server));
    let reply = client.complete(request()).await.unwrap();
    assert_eq!(response::flatten_text(&reply.content), "high");
}

#[tokio::test]
async fn tolerates_alternate_output_nesting() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "output": { "content": "medium" } }
            ]
        })))
        .mount(&server)
        .await;

    let client = GenerativeClient::new(config_for(&server));
    let reply = client.complete(request()).await.unwrap();
    assert_eq!(response::flatten_text(&reply.content), "medium");
}

#[tokio::test]
async fn non_success_status_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = GenerativeClient::new(config_for(&server));
    match client.complete(request()).await {
        Err(OracleError::Status(503)) => {}
        other => panic!("expected status error, got {other:?}"),
    }
}

#[tokio::test]
async fn body_without_candidates_is_ambiguous() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .mount(&server)
        .await;

    let client = GenerativeClient::new(config_for(&server));
    match client.complete(request()).await {
        Err(OracleError::Ambiguous) => {}
        other => panic!("expected ambiguous, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = GenerativeClient::new(config_for(&server));
    match client.complete(request()).await {
        Err(OracleError::Malformed(_)) => {}
        other => panic!("expected malformed, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_endpoint_is_unavailable() {
    // Nothing listens on this port.
    let client = GenerativeClient::new(OracleConfig {
        base_url: "http://127.0.0.1:9".to_string(),
        model: "test-model".to_string(),
        api_key: "test-key".to_string(),
        timeout: Duration::from_millis(200),
    });
    match client.complete(request()).await {
        Err(OracleError::Unavailable(_)) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
}
