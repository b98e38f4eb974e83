#![allow(clippy::unwrap_used)]
// Integration tests for `PurgeClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use akapurge_api::{ClientCredential, Error, PurgeClient};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PurgeClient, ClientCredential) {
    let server = MockServer::start().await;
    let client = PurgeClient::with_client(reqwest::Client::new());
    let credential = ClientCredential::new(
        "akab-host.purge.akamaiapis.net",
        "akab-client-token",
        "secret-of-client",
        "akab-access-token",
    )
    .unwrap();
    (server, client, credential)
}

fn endpoint(server: &MockServer, suffix: &str) -> Url {
    Url::parse(&format!("{}{suffix}", server.uri())).unwrap()
}

// ── Fast purge ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_post_signed_json() {
    let (server, client, credential) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ccu/v3/invalidate/tag/production"))
        .and(header("content-type", "application/json"))
        .and(header_regex(
            "authorization",
            r"^EG1-HMAC-SHA256 client_token=akab-client-token;access_token=akab-access-token;timestamp=\d{8}T\d{2}:\d{2}:\d{2}\+0000;nonce=[0-9a-f-]{36};signature=[A-Za-z0-9+/]+=*$",
        ))
        .and(body_json(json!({ "objects": ["promo", "home"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "httpStatus": 201,
            "detail": "Request accepted",
            "estimatedSeconds": 5,
            "purgeId": "e535071c-26b2-11e7-94d7-276f2f54d938",
            "supportId": "17PY1492793544958045-219026624"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client
        .post_json(
            &endpoint(&server, "/ccu/v3/invalidate/tag/production"),
            &credential,
            r#"{"objects":["promo","home"]}"#,
        )
        .await
        .unwrap();

    assert!(resp.is_created());
    let ack = resp.ack().unwrap();
    assert_eq!(ack.estimated_seconds, Some(5));
    assert_eq!(ack.support_id.as_deref(), Some("17PY1492793544958045-219026624"));
}

#[tokio::test]
async fn test_error_status_is_returned_not_raised() {
    let (server, client, credential) = setup().await;

    Mock::given(method("POST"))
        .and(path("/ccu/v3/invalidate/url/production"))
        .respond_with(ResponseTemplate::new(403).set_body_string("Forbidden"))
        .mount(&server)
        .await;

    let resp = client
        .post_json(
            &endpoint(&server, "/ccu/v3/invalidate/url/production"),
            &credential,
            r#"{"objects":["https://example.com/a"]}"#,
        )
        .await
        .unwrap();

    assert_eq!(resp.status, 403);
    assert_eq!(resp.body, "Forbidden");
    assert!(!resp.is_created());
}

// ── ECCU ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_eccu_request_id_ack() {
    let (server, client, credential) = setup().await;

    Mock::given(method("POST"))
        .and(path("/eccu-api/v1/requests"))
        .respond_with(
            ResponseTemplate::new(201).set_body_json(json!({ "requestId": 12_345 })),
        )
        .mount(&server)
        .await;

    let resp = client
        .post_json(
            &endpoint(&server, "/eccu-api/v1/requests"),
            &credential,
            r#"{"metadata":"<eccu/>"}"#,
        )
        .await
        .unwrap();

    assert!(resp.is_created());
    assert_eq!(resp.ack().unwrap().request_id, Some(json!(12_345)));
}

// ── Transport failures ──────────────────────────────────────────────

#[tokio::test]
async fn test_connection_refused_is_transport_error() {
    let (_server, client, credential) = setup().await;

    // Reserve a free port, then release it so nothing is listening there.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    let url = Url::parse(&format!(
        "http://127.0.0.1:{port}/ccu/v3/invalidate/tag/production"
    ))
    .unwrap();

    let result = client.post_json(&url, &credential, "{}").await;

    match result {
        Err(err @ Error::Transport(_)) => assert!(err.is_connection()),
        other => panic!("expected Transport error, got: {other:?}"),
    }
}
