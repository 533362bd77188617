//! Unified error type for Authgate.

use authgate_protocol::ProtocolError;
use authgate_session::{AuthError, Rejected, StoreError};
use authgate_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// Applications using the `authgate` meta crate can return this single
/// type and let `?` convert whatever a sub-crate produced.
#[derive(Debug, thiserror::Error)]
pub enum AuthgateError {
    /// Building the HTTP transport failed (bad base URL, TLS init).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A token could not be encoded or decoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The session store failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// An auth failure outside an operation.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// An operation was rejected. Its payload is already in the auth state.
    #[error(transparent)]
    Rejected(#[from] Rejected),

    /// Configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}
