//! HTTP transport for Authgate.
//!
//! Provides [`HttpAuthService`], the `reqwest`-backed implementation of
//! [`AuthServiceClient`](authgate_session::AuthServiceClient), and the
//! [`HttpConfig`] that points it at a service.
//!
//! Every failure while talking to the service comes back as a
//! [`ServiceError`](authgate_protocol::ServiceError): non-2xx answers as
//! `Rejected` with the response body, everything else (refused connection,
//! timeout, undecodable body) as `Network`. [`TransportError`] only covers
//! building the client.

mod config;
mod error;
mod http;

pub use config::{DEFAULT_TIMEOUT, HttpConfig};
pub use error::TransportError;
pub use http::HttpAuthService;
