//! Client-side auth state for Authgate.
//!
//! This crate handles the lifecycle of a client's authentication:
//!
//! 1. **State** — whether the user is logged in, who they are, which token
//!    they hold ([`AuthState`], [`AuthPhase`])
//! 2. **Operations** — register, login, logout, session check, reset
//!    ([`AuthController`])
//! 3. **Persistence** — keeping the token across restarts
//!    ([`SessionStore`], [`TokenStore`])
//!
//! # How it fits in the stack
//!
//! ```text
//! UI (above)  ← renders AuthState snapshots, invokes operations
//!     ↕
//! Session Layer (this crate)  ← owns AuthState and the token lifecycle
//!     ↕
//! Protocol Layer (below)  ← response types, token claims
//! ```
//!
//! The service itself is reached through the [`AuthServiceClient`] trait;
//! `authgate-transport` provides the HTTP implementation.

mod config;
mod controller;
mod error;
mod service;
mod state;
mod store;

pub use config::{ControllerConfig, LogoutFailure, StalePolicy};
pub use controller::AuthController;
pub use error::{AuthError, Rejected, StoreError};
pub use service::AuthServiceClient;
pub use state::{AuthPhase, AuthState};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, TokenStore};
