//! Wire protocol for Authgate.
//!
//! This crate defines what the client and the remote auth service exchange:
//!
//! - **Types** ([`LoginResponse`], [`SessionResponse`], [`ErrorPayload`],
//!   [`Operation`]) — the response bodies and error values that come back
//!   from the service.
//! - **Token decoding** ([`TokenDecoder`] trait, [`JwtDecoder`]) — how the
//!   client reads the claims of a token it holds, without verifying it.
//! - **Errors** ([`ProtocolError`], [`ServiceError`]) — what can go wrong
//!   while decoding tokens or talking to the service.
//!
//! # Architecture
//!
//! The protocol layer sits between the transport (HTTP) and the session
//! layer (auth state). It knows nothing about requests or state; it only
//! describes the data.
//!
//! ```text
//! Transport (HTTP) → Protocol (responses, claims) → Session (AuthState)
//! ```

// ---------------------------------------------------------------------------
// Module declarations
// ---------------------------------------------------------------------------

mod error;
mod token;
mod types;

// ---------------------------------------------------------------------------
// Re-exports
// ---------------------------------------------------------------------------

pub use error::{ProtocolError, ServiceError};
#[cfg(feature = "jwt")]
pub use token::JwtDecoder;
pub use token::{TokenClaims, TokenDecoder, decode_stored_token, encode_stored_token};
pub use types::{ErrorPayload, LoginResponse, Operation, SessionResponse};
