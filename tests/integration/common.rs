//! Shared test doubles and helpers

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use kalshi_gateway::auth::Credentials;
use kalshi_gateway::market::{MarketApiError, MarketRanker, MarketSource, RawMarket};
use kalshi_gateway::proxy::{
    AppState, ProxyError, ProxySettings, Upstream, UpstreamRequest, UpstreamResponse,
};
use reqwest::Url;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const PKCS8_PEM: &str = include_str!("../fixtures/test_key_pkcs8.pem");
pub const PKCS1_PEM: &str = include_str!("../fixtures/test_key_pkcs1.pem");
pub const UPSTREAM_BASE: &str = "https://api.example.com/trade-api/v2";

/// Upstream double that records every request and returns a canned answer
pub struct MockUpstream {
    requests: Mutex<Vec<UpstreamRequest>>,
    status: StatusCode,
    body: &'static str,
    fail: bool,
}

impl MockUpstream {
    pub fn responding(status: StatusCode, body: &'static str) -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            status,
            body,
            fail: false,
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            requests: Mutex::new(Vec::new()),
            status: StatusCode::OK,
            body: "",
            fail: true,
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        self.requests.lock().unwrap().push(request);
        if self.fail {
            return Err(ProxyError::Network("connection refused".to_string()));
        }
        Ok(UpstreamResponse {
            status: self.status,
            body: Bytes::from_static(self.body.as_bytes()),
        })
    }
}

/// Market source returning a fixed list
pub struct StaticSource(pub Vec<RawMarket>);

#[async_trait]
impl MarketSource for StaticSource {
    async fn fetch_open_markets(&self, _limit: usize) -> Result<Vec<RawMarket>, MarketApiError> {
        Ok(self.0.clone())
    }
}

pub fn credentials() -> Credentials {
    Credentials::new("test-key-id", PKCS8_PEM)
}

pub fn settings() -> ProxySettings {
    ProxySettings {
        mount_path: "/api/kalshi".to_string(),
        upstream_base: Url::parse(UPSTREAM_BASE).unwrap(),
        cache_max_age_secs: 10,
        allow_unauthenticated_reads: true,
    }
}

pub fn state_with(
    upstream: Arc<MockUpstream>,
    credentials: Option<Credentials>,
    markets: Vec<RawMarket>,
) -> AppState {
    AppState {
        settings: Arc::new(settings()),
        credentials: credentials.map(Arc::new),
        upstream,
        ranker: MarketRanker::new(Arc::new(StaticSource(markets))),
    }
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

pub async fn send(app: Router, method: &str, uri: &str, body: &str) -> TestResponse {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    TestResponse {
        status,
        headers,
        body,
    }
}

pub fn assert_cors(headers: &HeaderMap) {
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert_eq!(headers["access-control-allow-methods"], "GET, POST, OPTIONS");
    assert_eq!(headers["access-control-allow-headers"], "Content-Type");
    assert_eq!(headers["access-control-max-age"], "86400");
}
