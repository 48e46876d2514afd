//! Proxy request dispatch
//!
//! Every inbound request under the mount path maps to exactly one upstream
//! call (or none, for preflight and rejected requests):
//! - OPTIONS: 204, never forwarded
//! - GET: forwarded with query string, signed when credentials exist
//! - POST: requires credentials, body forwarded unmodified

use super::upstream::{UpstreamRequest, UpstreamResponse};
use super::{AppState, ProxyError, ProxySettings};
use crate::auth::{AuthHeaderSet, Credentials};
use crate::telemetry::{record_latency, record_proxy_request, LatencyMetric, ProxyOutcome};
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::http::{HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use reqwest::Url;
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

/// Handler for every method on `{mount_path}/*path`
#[instrument(
    name = "proxy",
    skip_all,
    fields(request_id = %Uuid::new_v4(), method = %method, path = %uri.path())
)]
pub async fn proxy_handler(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let result = match &method {
        &Method::OPTIONS => Ok(preflight()),
        &Method::GET => forward_get(&state, &uri).await,
        &Method::POST => forward_post(&state, &uri, body).await,
        other => Err(ProxyError::MethodNotAllowed(other.clone())),
    };

    let outcome = match &result {
        Ok(_) if method == Method::OPTIONS => ProxyOutcome::Preflight,
        Ok(_) => ProxyOutcome::Relayed,
        Err(ProxyError::CredentialsMissing) => ProxyOutcome::Unauthorized,
        Err(ProxyError::MethodNotAllowed(_)) => ProxyOutcome::Rejected,
        Err(_) => ProxyOutcome::Failed,
    };
    record_proxy_request(method.as_str(), outcome);

    match result {
        Ok(response) => response,
        Err(e) => {
            if matches!(outcome, ProxyOutcome::Failed) {
                tracing::error!(error = %e, "Proxy request failed");
            } else {
                tracing::info!(error = %e, "Proxy request rejected");
            }
            e.into_response()
        }
    }
}

/// Preflight short-circuit; CORS headers are added by the router
fn preflight() -> Response {
    StatusCode::NO_CONTENT.into_response()
}

async fn forward_get(state: &AppState, uri: &Uri) -> Result<Response, ProxyError> {
    let settings = &state.settings;
    let credentials = state.credentials.as_deref();

    if credentials.is_none() && !settings.allow_unauthenticated_reads {
        return Err(ProxyError::CredentialsMissing);
    }

    let url = upstream_url(settings, uri)?;
    let auth = sign_for(credentials, &Method::GET, &url)?;

    let upstream = dispatch(state, Method::GET, url, auth, None).await?;
    let cache_control = format!("public, max-age={}", settings.cache_max_age_secs);

    Ok(relay(upstream, Some(cache_control)))
}

async fn forward_post(state: &AppState, uri: &Uri, body: Bytes) -> Result<Response, ProxyError> {
    let credentials = state
        .credentials
        .as_deref()
        .ok_or(ProxyError::CredentialsMissing)?;

    let url = upstream_url(&state.settings, uri)?;
    let auth = sign_for(Some(credentials), &Method::POST, &url)?;

    let upstream = dispatch(state, Method::POST, url, auth, Some(body)).await?;
    Ok(relay(upstream, None))
}

/// Sign over the upstream path; `None` when running unauthenticated
fn sign_for(
    credentials: Option<&Credentials>,
    method: &Method,
    url: &Url,
) -> Result<Option<AuthHeaderSet>, ProxyError> {
    match credentials {
        Some(credentials) => Ok(Some(credentials.authorize(method, url.path())?)),
        None => {
            tracing::debug!("No credentials configured, forwarding unauthenticated");
            Ok(None)
        }
    }
}

async fn dispatch(
    state: &AppState,
    method: Method,
    url: Url,
    auth: Option<AuthHeaderSet>,
    body: Option<Bytes>,
) -> Result<UpstreamResponse, ProxyError> {
    tracing::debug!(
        upstream_url = %url,
        authenticated = auth.is_some(),
        "Forwarding to upstream"
    );

    let started = Instant::now();
    let response = state
        .upstream
        .send(UpstreamRequest {
            method,
            url,
            auth,
            body,
        })
        .await;
    record_latency(LatencyMetric::Upstream, started.elapsed());

    let response = response?;
    tracing::info!(status = response.status.as_u16(), "Upstream responded");
    Ok(response)
}

/// Relay upstream status and body unchanged
fn relay(upstream: UpstreamResponse, cache_control: Option<String>) -> Response {
    let mut response = Response::new(Body::from(upstream.body));
    *response.status_mut() = upstream.status;

    let headers = response.headers_mut();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(value) = cache_control.and_then(|v| HeaderValue::from_str(&v).ok()) {
        headers.insert(CACHE_CONTROL, value);
    }

    response
}

/// Map an inbound URI under the mount path to the upstream URL
///
/// `/api/kalshi/markets?status=open` becomes
/// `{base}/markets?status=open`. The result must stay under the base path.
pub fn upstream_url(settings: &ProxySettings, uri: &Uri) -> Result<Url, ProxyError> {
    let sub_path = uri
        .path()
        .strip_prefix(settings.mount_path.as_str())
        .ok_or_else(|| ProxyError::InvalidUrl(format!("{} is outside the mount path", uri.path())))?
        .trim_start_matches('/');

    // An upstream that decodes %2F would see extra path segments
    if sub_path.to_ascii_lowercase().contains("%2f") {
        return Err(ProxyError::InvalidUrl(format!(
            "{} contains an encoded path separator",
            sub_path
        )));
    }

    let base = &settings.upstream_base;
    let mut url = Url::parse(&format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        sub_path
    ))
    .map_err(|e| ProxyError::InvalidUrl(e.to_string()))?;
    url.set_query(uri.query());

    let base_path = base.path().trim_end_matches('/');
    let within_base = url.path() == base_path || url.path().starts_with(&format!("{}/", base_path));
    if !within_base {
        return Err(ProxyError::InvalidUrl(format!(
            "{} escapes the upstream base path",
            sub_path
        )));
    }

    Ok(url)
}
