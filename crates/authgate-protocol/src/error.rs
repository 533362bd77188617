//! Error types for the protocol layer.
//!
//! Each crate in Authgate defines its own error enum. A `ProtocolError`
//! means a token or a stored value could not be read; a `ServiceError`
//! means the remote auth service (or the road to it) failed a call.

use serde_json::Value;

/// Errors from decoding tokens and the values persisted for them.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// The token is not a compact `header.payload.signature` string.
    #[error("malformed token: {0}")]
    MalformedToken(String),

    /// The claims segment is not valid base64url.
    #[error("invalid token encoding: {0}")]
    InvalidEncoding(String),

    /// The claims segment decoded but is not the expected JSON object
    /// (for example, `exp` is missing or not a number).
    #[error("invalid token claims: {0}")]
    InvalidClaims(serde_json::Error),

    /// A token could not be serialized for storage.
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// A stored value is not a JSON-encoded token string.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),
}

/// A failed call to the auth service.
///
/// This is the service/network half of the error taxonomy. Local
/// validation failures (no token, expired token) never reach the service
/// and live in the session layer.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service answered, but with a non-success status.
    ///
    /// `payload` is the response body, when there was one.
    #[error("auth service rejected the request with status {status}")]
    Rejected { status: u16, payload: Option<Value> },

    /// The request never got a usable answer: connection refused, timeout,
    /// or a success body that could not be decoded.
    #[error("network error: {0}")]
    Network(String),
}

impl ServiceError {
    /// The structured payload the service sent, if any.
    pub fn payload(&self) -> Option<&Value> {
        match self {
            Self::Rejected { payload, .. } => payload.as_ref(),
            Self::Network(_) => None,
        }
    }

    /// Returns `true` if retrying the same call could succeed.
    ///
    /// Network failures and 5xx answers are transient; 4xx answers are not.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Rejected { status, .. } => *status >= 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_service_error_payload_returns_body() {
        let err = ServiceError::Rejected {
            status: 401,
            payload: Some(json!({"message": "bad credentials"})),
        };
        assert_eq!(err.payload(), Some(&json!({"message": "bad credentials"})));
    }

    #[test]
    fn test_service_error_network_has_no_payload() {
        let err = ServiceError::Network("connection refused".into());
        assert!(err.payload().is_none());
    }

    #[test]
    fn test_service_error_is_transient() {
        assert!(ServiceError::Network("timeout".into()).is_transient());
        assert!(
            ServiceError::Rejected { status: 503, payload: None }.is_transient()
        );
        assert!(
            !ServiceError::Rejected { status: 401, payload: None }.is_transient()
        );
    }

    #[test]
    fn test_service_error_display_includes_status() {
        let err = ServiceError::Rejected { status: 400, payload: None };
        assert!(err.to_string().contains("400"));
    }
}
