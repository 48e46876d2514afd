//! End-to-end signed forwarding

use crate::common::{assert_cors, credentials, send, state_with, MockUpstream, PKCS1_PEM, PKCS8_PEM};
use axum::http::StatusCode;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use kalshi_gateway::auth::{import_private_key, Credentials};
use kalshi_gateway::proxy::router;
use rsa::pss::Signature;
use rsa::signature::Verifier;

fn verify(message: &str, signature_b64: &str) {
    let verifying_key = import_private_key(PKCS8_PEM).unwrap().verifying_key();
    let bytes = STANDARD.decode(signature_b64).unwrap();
    let signature = Signature::try_from(bytes.as_slice()).unwrap();
    verifying_key
        .verify(message.as_bytes(), &signature)
        .expect("signature should verify");
}

#[tokio::test]
async fn test_signed_get_round_trip() {
    let body = r#"{"markets":[{"ticker":"A"},{"ticker":"B"}],"cursor":"next"}"#;
    let upstream = MockUpstream::responding(StatusCode::OK, body);
    let app = router(state_with(upstream.clone(), Some(credentials()), vec![]));

    let before = chrono::Utc::now().timestamp_millis();
    let response = send(app, "GET", "/api/kalshi/markets?status=open&limit=2", "").await;
    let after = chrono::Utc::now().timestamp_millis();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, body.as_bytes());
    assert_eq!(response.headers["content-type"], "application/json");
    assert_eq!(response.headers["cache-control"], "public, max-age=10");
    assert_cors(&response.headers);

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, reqwest::Method::GET);
    assert_eq!(
        request.url.as_str(),
        "https://api.example.com/trade-api/v2/markets?status=open&limit=2"
    );
    assert!(request.body.is_none());

    let auth = request.auth.as_ref().unwrap();
    assert_eq!(auth.key_id(), "test-key-id");
    assert!(auth.timestamp() >= before && auth.timestamp() <= after);

    let message = format!("{}GET/trade-api/v2/markets", auth.timestamp());
    verify(&message, auth.signature());
}

#[tokio::test]
async fn test_signed_post_forwards_body() {
    let payload = r#"{"ticker":"KXBTC","action":"buy","side":"yes","count":3,"type":"limit","yes_price":42}"#;
    let upstream = MockUpstream::responding(StatusCode::CREATED, r#"{"order":{"order_id":"o-1"}}"#);
    let app = router(state_with(upstream.clone(), Some(credentials()), vec![]));

    let response = send(app, "POST", "/api/kalshi/portfolio/orders", payload).await;

    assert_eq!(response.status, StatusCode::CREATED);
    assert!(response.headers.get("cache-control").is_none());
    assert_cors(&response.headers);

    let requests = upstream.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, reqwest::Method::POST);
    assert_eq!(request.body.as_deref(), Some(payload.as_bytes()));

    let auth = request.auth.as_ref().unwrap();
    let message = format!("{}POST/trade-api/v2/portfolio/orders", auth.timestamp());
    verify(&message, auth.signature());
}

#[tokio::test]
async fn test_pkcs1_credentials_sign_verifiably() {
    let upstream = MockUpstream::responding(StatusCode::OK, "{}");
    let creds = Credentials::new("test-key-id", PKCS1_PEM);
    let app = router(state_with(upstream.clone(), Some(creds), vec![]));

    let response = send(app, "GET", "/api/kalshi/exchange/status", "").await;
    assert_eq!(response.status, StatusCode::OK);

    let requests = upstream.requests();
    let auth = requests[0].auth.as_ref().unwrap();
    let message = format!("{}GET/trade-api/v2/exchange/status", auth.timestamp());
    verify(&message, auth.signature());
}

#[tokio::test]
async fn test_env_style_escaped_key() {
    let escaped = PKCS8_PEM.replace('\n', "\\n");
    let creds = Credentials::from_parts(Some("test-key-id".to_string()), Some(escaped)).unwrap();

    let headers = creds
        .authorize(&reqwest::Method::GET, "/trade-api/v2/markets")
        .unwrap();
    let message = format!("{}GET/trade-api/v2/markets", headers.timestamp());
    verify(&message, headers.signature());
}
