//! Market API error types

use crate::auth::AuthError;
use serde::Deserialize;
use thiserror::Error;

/// Failure talking to the market API
///
/// `Api` means the server answered with a non-success status; the other
/// variants mean no usable answer arrived.
#[derive(Debug, Error)]
pub enum MarketApiError {
    /// Upstream responded with an error status
    #[error("Market API error {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },
    /// Connection, DNS, TLS or timeout failure
    #[error("Market API transport error: {0}")]
    Transport(String),
    /// Response body did not match the expected shape
    #[error("Market API decode error: {0}")]
    Decode(String),
    /// Request could not be signed
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl MarketApiError {
    /// HTTP status, when the upstream responded
    pub fn status(&self) -> Option<u16> {
        match self {
            MarketApiError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Upstream error code, when one was given
    pub fn code(&self) -> Option<&str> {
        match self {
            MarketApiError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Build an `Api` error from a failed response body
    ///
    /// Understands Kalshi's `{"error": {"code", "message"}}` and the proxy's
    /// own `{"error": "...", "details": "..."}`; anything else is kept as text.
    pub fn from_response(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum ErrorField {
            Detailed {
                code: Option<String>,
                message: Option<String>,
            },
            Text(String),
        }

        #[derive(Deserialize)]
        struct ErrorBody {
            error: ErrorField,
            details: Option<String>,
        }

        let (code, message) = match serde_json::from_str::<ErrorBody>(body) {
            Ok(ErrorBody {
                error: ErrorField::Detailed { code, message },
                ..
            }) => (code, message.unwrap_or_default()),
            Ok(ErrorBody {
                error: ErrorField::Text(text),
                details,
            }) => match details {
                Some(details) => (None, format!("{}: {}", text, details)),
                None => (None, text),
            },
            Err(_) => (None, body.trim().to_string()),
        };

        MarketApiError::Api {
            status,
            code,
            message,
        }
    }
}

impl From<reqwest::Error> for MarketApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            MarketApiError::Decode(err.to_string())
        } else {
            MarketApiError::Transport(err.to_string())
        }
    }
}
