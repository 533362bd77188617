//! Error types for the session layer.

use authgate_protocol::{ErrorPayload, Operation, ProtocolError, ServiceError};
use serde_json::Value;

/// Errors from a [`SessionStore`](crate::SessionStore) backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Reading or writing the backing file failed.
    #[error("session store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The backing file exists but is not a JSON object of strings.
    #[error("session store is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// A thread panicked while holding the store's lock.
    #[error("session store lock poisoned")]
    Poisoned,
}

/// Why an auth operation failed.
///
/// Covers the whole taxonomy: failures reported by the service or the
/// network ([`AuthError::Service`]) and local validation failures that
/// stop `check_auth` before any request is sent.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The service rejected the call, or the network failed it.
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// There is no persisted token to validate.
    #[error("No token found.")]
    NoToken,

    /// The persisted token could not be read or its claims decoded.
    #[error("invalid token: {0}")]
    InvalidToken(#[from] ProtocolError),

    /// The token's `exp` claim is at or before the current time.
    #[error("token expired at {exp}")]
    TokenExpired { exp: f64 },

    /// The session store could not be read.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Returns `true` if the failure was decided locally, without a
    /// network call.
    pub fn is_local(&self) -> bool {
        !matches!(self, Self::Service(_))
    }

    /// Returns `true` if retrying could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Service(e) => e.is_transient(),
            _ => false,
        }
    }

    /// The payload recorded in auth state when `operation` fails with
    /// this error.
    ///
    /// A non-empty service payload is used verbatim. Otherwise the result
    /// is "No token found." for a missing token, and the operation's
    /// fallback message for everything else.
    pub fn payload_for(&self, operation: Operation) -> ErrorPayload {
        match self {
            Self::Service(e) => match e.payload() {
                Some(body) if !is_empty_body(body) => {
                    ErrorPayload::from_body(body.clone())
                }
                _ => operation.fallback_message().into(),
            },
            Self::NoToken => "No token found.".into(),
            Self::InvalidToken(_) | Self::TokenExpired { .. } | Self::Store(_) => {
                operation.fallback_message().into()
            }
        }
    }
}

fn is_empty_body(body: &Value) -> bool {
    match body {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// The uniform failure outcome of every controller operation.
///
/// `payload` is exactly what was written to
/// [`AuthState::error`](crate::AuthState::error); `error` keeps the
/// underlying cause for callers that want to branch on it.
#[derive(Debug, thiserror::Error)]
#[error("{operation} rejected: {payload}")]
pub struct Rejected {
    pub operation: Operation,
    #[source]
    pub error: AuthError,
    pub payload: ErrorPayload,
}

impl Rejected {
    /// Wraps `error` as the rejection of `operation`, resolving its payload.
    pub fn new(operation: Operation, error: AuthError) -> Self {
        let payload = error.payload_for(operation);
        Self {
            operation,
            error,
            payload,
        }
    }
}
