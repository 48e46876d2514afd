//! Upstream request authentication
//!
//! Kalshi authenticates API calls with RSA-PSS (SHA-256) signatures over
//! `timestamp + method + path`. This module turns a configured credential into
//! the three `KALSHI-ACCESS-*` headers for a single outbound request.

mod headers;
mod key;
mod signer;
mod types;

pub use headers::{AuthHeaderSet, ACCESS_KEY_HEADER, ACCESS_SIGNATURE_HEADER, ACCESS_TIMESTAMP_HEADER};
pub use key::{import_private_key, KeyFormat, SigningKeyHandle};
pub use signer::{sign_request, SignedRequest};
pub use types::AuthError;

use chrono::Utc;
use reqwest::Method;
use std::fmt;

/// Environment variable holding the API key identifier
pub const API_KEY_ID_ENV: &str = "KALSHI_API_KEY_ID";
/// Environment variable holding the PEM-encoded RSA private key
pub const PRIVATE_KEY_ENV: &str = "KALSHI_PRIVATE_KEY";

/// API key identifier plus the private key material it was issued for
#[derive(Clone)]
pub struct Credentials {
    key_id: String,
    private_key_pem: String,
}

impl Credentials {
    /// Create credentials from a key id and PEM private key
    pub fn new(key_id: impl Into<String>, private_key_pem: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            private_key_pem: private_key_pem.into(),
        }
    }

    /// Build credentials only when both halves are present and non-blank
    pub fn from_parts(key_id: Option<String>, private_key_pem: Option<String>) -> Option<Self> {
        let key_id = key_id.filter(|k| !k.trim().is_empty())?;
        let pem = private_key_pem.filter(|p| !p.trim().is_empty())?;
        Some(Self::new(key_id.trim(), unescape_newlines(&pem)))
    }

    /// Read credentials from `KALSHI_API_KEY_ID` and `KALSHI_PRIVATE_KEY`
    pub fn from_env() -> Option<Self> {
        Self::from_parts(
            std::env::var(API_KEY_ID_ENV).ok(),
            std::env::var(PRIVATE_KEY_ENV).ok(),
        )
    }

    /// API key identifier sent as `KALSHI-ACCESS-KEY`
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Import the private key into a signing handle
    pub fn signing_key(&self) -> Result<SigningKeyHandle, AuthError> {
        import_private_key(&self.private_key_pem)
    }

    /// Sign one outbound request and build its auth headers
    ///
    /// The timestamp is captured here once and used for both the signed
    /// message and the `KALSHI-ACCESS-TIMESTAMP` header.
    pub fn authorize(&self, method: &Method, path: &str) -> Result<AuthHeaderSet, AuthError> {
        let key = self.signing_key()?;
        let request = SignedRequest::new(Utc::now().timestamp_millis(), method.clone(), path);
        let signature = sign_request(&key, &request)?;
        Ok(AuthHeaderSet::new(&self.key_id, request.timestamp(), signature))
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("key_id", &self.key_id)
            .field("private_key_pem", &"<redacted>")
            .finish()
    }
}

/// Secret stores often flatten multi-line values into literal `\n`
fn unescape_newlines(pem: &str) -> String {
    pem.replace("\\n", "\n")
}
