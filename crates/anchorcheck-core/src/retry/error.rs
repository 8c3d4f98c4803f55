//! Transport error type for retry classification.

use std::fmt;

/// Error returned by a single call to the anchoring backend.
/// Kept separate from `VerifyError` so we can classify and decide retries first.
#[derive(Debug)]
pub enum TransportError {
    /// Curl reported an error (timeout, connection, etc.).
    Curl(curl::Error),
    /// HTTP response had a non-2xx status. `detail` is the backend's
    /// `{"detail": "..."}` message when the error body carried one.
    Http { code: u32, detail: Option<String> },
    /// Response body was not the JSON we expected.
    Decode(serde_json::Error),
    /// Endpoint URL could not be built from the configured API base.
    InvalidUrl(url::ParseError),
}

impl TransportError {
    /// HTTP status code, if the backend answered at all.
    pub fn http_status(&self) -> Option<u32> {
        match self {
            TransportError::Http { code, .. } => Some(*code),
            _ => None,
        }
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Curl(e) => write!(f, "{}", e),
            TransportError::Http { code, detail } => match detail {
                Some(d) => write!(f, "HTTP {}: {}", code, d),
                None => write!(f, "HTTP {}", code),
            },
            TransportError::Decode(e) => write!(f, "unexpected response body: {}", e),
            TransportError::InvalidUrl(e) => write!(f, "invalid endpoint URL: {}", e),
        }
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TransportError::Curl(e) => Some(e),
            TransportError::Decode(e) => Some(e),
            TransportError::InvalidUrl(e) => Some(e),
            TransportError::Http { .. } => None,
        }
    }
}

impl From<curl::Error> for TransportError {
    fn from(e: curl::Error) -> Self {
        TransportError::Curl(e)
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        TransportError::Decode(e)
    }
}

impl From<url::ParseError> for TransportError {
    fn from(e: url::ParseError) -> Self {
        TransportError::InvalidUrl(e)
    }
}
