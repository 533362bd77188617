//! # Authgate
//!
//! Client-side authentication state for web service clients.
//!
//! Authgate tracks whether a user is logged in, holds their session token
//! and profile, and drives that state through register, login, logout, and
//! session checks against a remote auth service. The token survives
//! restarts through a session store.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use authgate::prelude::*;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), AuthgateError> {
//! authgate::init_tracing("info");
//!
//! let client = AuthClientBuilder::from_config(&ClientConfig::from_env()?).build()?;
//!
//! client
//!     .login(&json!({"userEmail": "a@example.com", "password": "secret"}))
//!     .await?;
//! assert_eq!(client.snapshot().phase(), AuthPhase::Authenticated);
//!
//! client.logout().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crates
//!
//! - `authgate-protocol` — response types, error payloads, token claims
//! - `authgate-session` — the state machine, controller, and session stores
//! - `authgate-transport` — the HTTP service client

mod builder;
mod config;
mod error;
mod logging;

pub use builder::{AuthClient, AuthClientBuilder, SessionBackend};
pub use config::{
    API_URL_VAR, ClientConfig, SESSION_FILE_VAR, TIMEOUT_VAR, TOKEN_KEY_VAR,
};
pub use error::AuthgateError;
pub use logging::init_tracing;

pub use authgate_protocol as protocol;
pub use authgate_session as session;
pub use authgate_transport as transport;

/// Everything most applications need, in one import.
pub mod prelude {
    pub use crate::{
        AuthClient, AuthClientBuilder, AuthgateError, ClientConfig,
        SessionBackend, init_tracing,
    };
    pub use authgate_protocol::{
        ErrorPayload, LoginResponse, Operation, ServiceError, SessionResponse,
        TokenClaims, TokenDecoder,
    };
    pub use authgate_session::{
        AuthController, AuthError, AuthPhase, AuthServiceClient, AuthState,
        ControllerConfig, FileSessionStore, LogoutFailure, MemorySessionStore,
        Rejected, SessionStore, StalePolicy,
    };
    pub use authgate_transport::{HttpAuthService, HttpConfig};
}
