//! Token claim decoding and the stored form of a token.
//!
//! The client never verifies a token's signature; that is the service's
//! job. It only peeks at the claims to decide whether a token it holds is
//! still worth sending. The [`TokenDecoder`] trait is that peek, so tests
//! and non-JWT deployments can swap in their own reader.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::ProtocolError;

// ---------------------------------------------------------------------------
// TokenClaims
// ---------------------------------------------------------------------------

/// The claims the client reads from a token.
///
/// Only `exp` is required. Everything else the token carries is kept in
/// `extra` untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Expiry, in seconds since the Unix epoch. May be fractional.
    pub exp: f64,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TokenClaims {
    /// Returns `true` if the token is expired at `now` (seconds since epoch).
    ///
    /// A token whose `exp` equals `now` is already expired.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.exp <= now as f64
    }
}

// ---------------------------------------------------------------------------
// TokenDecoder
// ---------------------------------------------------------------------------

/// Reads the claims out of a token string without verifying it.
///
/// The decoder is owned by a controller, which may be shared across tasks.
pub trait TokenDecoder: Send + Sync + 'static {
    /// Decodes the token's claims.
    ///
    /// # Errors
    /// Returns a [`ProtocolError`] if the token is not in the expected
    /// shape or its claims do not include a numeric `exp`.
    fn decode(&self, token: &str) -> Result<TokenClaims, ProtocolError>;
}

/// A [`TokenDecoder`] for compact JWTs (`header.payload.signature`).
///
/// The payload segment is base64url; trailing `=` padding is tolerated.
/// The signature segment may be empty.
///
/// ```rust
/// use authgate_protocol::{JwtDecoder, TokenDecoder};
///
/// // {"alg":"none"} . {"exp":4102444800} .
/// let token = "eyJhbGciOiJub25lIn0.eyJleHAiOjQxMDI0NDQ4MDB9.";
/// let claims = JwtDecoder.decode(token).unwrap();
/// assert_eq!(claims.exp, 4102444800.0);
/// ```
#[cfg(feature = "jwt")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JwtDecoder;

#[cfg(feature = "jwt")]
impl TokenDecoder for JwtDecoder {
    fn decode(&self, token: &str) -> Result<TokenClaims, ProtocolError> {
        use base64::Engine;
        use base64::engine::general_purpose::URL_SAFE_NO_PAD;

        let segments: Vec<&str> = token.split('.').collect();
        let [_header, payload, _signature] = segments.as_slice() else {
            return Err(ProtocolError::MalformedToken(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };

        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| ProtocolError::InvalidEncoding(e.to_string()))?;

        serde_json::from_slice(&bytes).map_err(ProtocolError::InvalidClaims)
    }
}

// ---------------------------------------------------------------------------
// Stored form
// ---------------------------------------------------------------------------

/// Serializes a token for the session store (as a JSON string).
///
/// # Errors
/// Returns [`ProtocolError::Encode`] if serialization fails.
pub fn encode_stored_token(token: &str) -> Result<String, ProtocolError> {
    serde_json::to_string(token).map_err(ProtocolError::Encode)
}

/// Reads a token back from its stored form.
///
/// A stored JSON `null` reads as no token.
///
/// # Errors
/// Returns [`ProtocolError::Decode`] if the value is not a JSON string or
/// `null`.
pub fn decode_stored_token(raw: &str) -> Result<Option<String>, ProtocolError> {
    serde_json::from_str(raw).map_err(ProtocolError::Decode)
}
