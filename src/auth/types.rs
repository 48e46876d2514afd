//! Authentication error types

use thiserror::Error;

/// Errors raised while importing keys or signing requests
#[derive(Debug, Error)]
pub enum AuthError {
    /// PEM armour was missing or contained no key body
    #[error("Invalid PEM: {0}")]
    InvalidPem(String),
    /// Key body was not valid base64
    #[error("Invalid base64 in key body: {0}")]
    Base64(#[from] base64::DecodeError),
    /// Key bytes were neither PKCS#8 nor PKCS#1 RSA, or failed to load
    #[error("Key import failed: {0}")]
    KeyImport(String),
    /// The RSA-PSS primitive rejected the signing input
    #[error("Signing failed: {0}")]
    Signing(String),
}
