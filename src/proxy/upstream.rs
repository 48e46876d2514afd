//! Outbound calls to the upstream trade API

use super::ProxyError;
use crate::auth::AuthHeaderSet;
use async_trait::async_trait;
use axum::body::Bytes;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method, StatusCode, Url};
use std::time::Duration;

/// A fully-resolved request to send upstream
#[derive(Debug, Clone)]
pub struct UpstreamRequest {
    pub method: Method,
    pub url: Url,
    pub auth: Option<AuthHeaderSet>,
    pub body: Option<Bytes>,
}

/// Upstream status and body, relayed verbatim
#[derive(Debug, Clone)]
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

/// Sends proxied requests to the upstream host
///
/// Non-2xx responses are returned as `Ok`; only transport failures are errors.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError>;
}

/// reqwest-backed upstream
pub struct HttpUpstream {
    client: Client,
}

impl HttpUpstream {
    /// Build a client with a fixed User-Agent and optional timeout
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> Result<Self, ProxyError> {
        let mut builder = Client::builder().user_agent(user_agent.to_string());
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

#[async_trait]
impl Upstream for HttpUpstream {
    async fn send(&self, request: UpstreamRequest) -> Result<UpstreamResponse, ProxyError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .header(CONTENT_TYPE, "application/json");

        if let Some(ref auth) = request.auth {
            for (name, value) in auth.to_pairs() {
                builder = builder.header(name, value);
            }
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        Ok(UpstreamResponse { status, body })
    }
}
