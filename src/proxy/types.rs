//! Proxy error types

use crate::auth::AuthError;
use axum::http::{header::ALLOW, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

/// Failures handling a proxied request
///
/// Upstream error statuses are not in here: they are relayed, not raised.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// Request needs credentials and none are configured
    #[error("API credentials not configured")]
    CredentialsMissing,
    /// Key import or signing failed
    #[error(transparent)]
    Auth(#[from] AuthError),
    /// Upstream URL could not be built from the inbound path
    #[error("Invalid upstream URL: {0}")]
    InvalidUrl(String),
    /// Connection, DNS, TLS, timeout or body read failure
    #[error("Upstream request failed: {0}")]
    Network(String),
    /// Method outside OPTIONS/GET/POST
    #[error("Method {0} not allowed")]
    MethodNotAllowed(Method),
}

impl ProxyError {
    pub fn status(&self) -> StatusCode {
        match self {
            ProxyError::CredentialsMissing => StatusCode::UNAUTHORIZED,
            ProxyError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<reqwest::Error> for ProxyError {
    fn from(err: reqwest::Error) -> Self {
        ProxyError::Network(err.to_string())
    }
}

/// JSON error body returned to callers
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        match self {
            ProxyError::CredentialsMissing => {
                let body = ErrorBody {
                    error: self.to_string(),
                    details: None,
                };
                (status, Json(body)).into_response()
            }
            ProxyError::MethodNotAllowed(_) => {
                let body = ErrorBody {
                    error: self.to_string(),
                    details: None,
                };
                (status, [(ALLOW, super::cors::ALLOWED_METHODS)], Json(body)).into_response()
            }
            _ => {
                let body = ErrorBody {
                    error: "Failed to proxy request".to_string(),
                    details: Some(self.to_string()),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}
