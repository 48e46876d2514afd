//! Kalshi auth header set

/// API key id header
pub const ACCESS_KEY_HEADER: &str = "KALSHI-ACCESS-KEY";
/// Millisecond timestamp header, must match the signed message
pub const ACCESS_TIMESTAMP_HEADER: &str = "KALSHI-ACCESS-TIMESTAMP";
/// Base64 RSA-PSS signature header
pub const ACCESS_SIGNATURE_HEADER: &str = "KALSHI-ACCESS-SIGNATURE";

/// The three headers authenticating a single upstream request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaderSet {
    key_id: String,
    timestamp: i64,
    signature: String,
}

impl AuthHeaderSet {
    pub fn new(key_id: &str, timestamp: i64, signature: String) -> Self {
        Self {
            key_id: key_id.to_string(),
            timestamp,
            signature,
        }
    }

    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Header name/value pairs in wire order
    pub fn to_pairs(&self) -> [(&'static str, String); 3] {
        [
            (ACCESS_KEY_HEADER, self.key_id.clone()),
            (ACCESS_TIMESTAMP_HEADER, self.timestamp.to_string()),
            (ACCESS_SIGNATURE_HEADER, self.signature.clone()),
        ]
    }
}
