//! RSA-PSS request signing

use super::{AuthError, SigningKeyHandle};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Method;
use rsa::signature::{RandomizedSigner, SignatureEncoding};

/// The parts of an outbound request covered by the signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    timestamp: i64,
    method: Method,
    canonical_path: String,
}

impl SignedRequest {
    /// Build from a timestamp (ms since epoch), method and path
    ///
    /// Any query string on `path` is dropped; Kalshi signs the bare path.
    pub fn new(timestamp: i64, method: Method, path: &str) -> Self {
        let canonical_path = path.split('?').next().unwrap_or_default().to_string();
        Self {
            timestamp,
            method,
            canonical_path,
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn canonical_path(&self) -> &str {
        &self.canonical_path
    }

    /// Exact byte string that gets signed: `{timestamp}{METHOD}{path}`
    pub fn message(&self) -> String {
        format!(
            "{}{}{}",
            self.timestamp,
            self.method.as_str(),
            self.canonical_path
        )
    }
}

/// Sign a request and return the base64-encoded signature
///
/// PSS is randomized, so two signatures over the same message differ while
/// both verifying.
pub fn sign_request(key: &SigningKeyHandle, request: &SignedRequest) -> Result<String, AuthError> {
    let mut rng = rand::thread_rng();
    let signature = key
        .inner()
        .try_sign_with_rng(&mut rng, request.message().as_bytes())
        .map_err(|e| AuthError::Signing(e.to_string()))?;

    Ok(STANDARD.encode(signature.to_bytes()))
}
