//! Integration tests for the checker client.
//!
//! These exercise the full request path against a mock backend: request
//! shape on the wire, reply reduction, auth header, error-status capture,
//! and the bounded timeout.

use std::time::Duration;

use proofpad_client::{ClientError, VerifierClient};
use proofpad_types::RecordId;
use url::Url;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, timeout: Duration) -> VerifierClient {
    let endpoint = Url::parse(&format!("{}/api/check", server.uri())).expect("endpoint url");
    VerifierClient::new(endpoint, timeout)
}

fn clean_response_body() -> serde_json::Value {
    serde_json::json!({
        "results": [{
            "id": "item-0",
            "time": 0.31,
            "response": { "messages": [] }
        }]
    })
}

#[tokio::test]
async fn sends_contract_shape_and_reduces_clean_reply() {
    let server = MockServer::start().await;
    let id = RecordId::generate();

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .and(body_partial_json(serde_json::json!({
            "sourceItems": [{ "id": id.to_string(), "code": "theorem t : 1 + 1 = 2 := by rfl" }],
            "reuse": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(clean_response_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let reply = client
        .check(id, "theorem t : 1 + 1 = 2 := by rfl")
        .await
        .expect("check succeeds");

    assert!(reply.pass);
    assert_eq!(reply.error, None);
    assert!(reply.warnings.is_empty());
}

#[tokio::test]
async fn formats_positioned_messages_from_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "id": "item-0",
                "response": { "messages": [
                    { "severity": "error",
                      "pos": { "line": 2, "column": 4 },
                      "endPos": { "line": 2, "column": 9 },
                      "data": "unknown identifier" },
                    { "severity": "warning", "data": "declaration uses sorry" }
                ] }
            }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let reply = client
        .check(RecordId::generate(), "bad code")
        .await
        .expect("transport succeeds");

    assert!(!reply.pass);
    assert_eq!(
        reply.error.as_deref(),
        Some("Line 2, Col 4: unknown identifier")
    );
    assert_eq!(reply.warnings, vec!["declaration uses sorry".to_string()]);
}

#[tokio::test]
async fn api_key_is_sent_as_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .and(header("authorization", "Bearer sk-test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(clean_response_body()))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5)).with_api_key("sk-test");
    client
        .check(RecordId::generate(), "#check Nat")
        .await
        .expect("check succeeds");
}

#[tokio::test]
async fn non_success_status_yields_status_error_with_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(503).set_body_string("worker pool exhausted"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let err = client
        .check(RecordId::generate(), "#check Nat")
        .await
        .expect_err("must fail");

    match err {
        ClientError::Status { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert!(body.contains("worker pool exhausted"));
        }
        other => panic!("expected status error, got: {other}"),
    }
}

#[tokio::test]
async fn slow_backend_trips_bounded_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(clean_response_body())
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_millis(200));
    let err = client
        .check(RecordId::generate(), "#check Nat")
        .await
        .expect_err("must time out");

    assert!(matches!(err, ClientError::Timeout { .. }));
    assert_eq!(err.failure_class(), "timeout");
    assert!(err.to_string().contains("did not respond"));
}

#[tokio::test]
async fn malformed_success_body_is_a_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/check"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server, Duration::from_secs(5));
    let err = client
        .check(RecordId::generate(), "#check Nat")
        .await
        .expect_err("must fail");

    assert!(matches!(err, ClientError::Decode { .. }));
    assert_eq!(err.failure_class(), "transport");
}

#[tokio::test]
async fn connection_refused_is_a_connect_error() {
    // Port 1 is reserved and nothing listens on it.
    let endpoint = Url::parse("http://127.0.0.1:1/api/check").expect("url");
    let client = VerifierClient::new(endpoint, Duration::from_secs(5));

    let err = client
        .check(RecordId::generate(), "#check Nat")
        .await
        .expect_err("must fail");

    assert!(matches!(
        err,
        ClientError::Connect { .. } | ClientError::Timeout { .. }
    ));
}
