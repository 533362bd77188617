//! Auth state: the record a UI renders, and the transitions that change it.
//!
//! [`AuthState`] is a plain value. Every transition is a method on it that
//! takes the operation's `Result` and matches on it, so the whole state
//! machine can be read (and tested) without a controller, a store, or a
//! network.
//!
//! ```text
//!                  login ok (success && token)
//!   Anonymous ──┬──────────────────────────────→ Authenticated
//!       ↑       │  (any op in flight: Authenticating)     │
//!       │       └── any failure ──→ Failed                │
//!       │                             │                   │
//!       └──── logout ok / reset ──────┴───────────────────┘
//! ```

use authgate_protocol::{ErrorPayload, LoginResponse, SessionResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{LogoutFailure, Rejected};

// ---------------------------------------------------------------------------
// AuthPhase
// ---------------------------------------------------------------------------

/// Coarse view of an [`AuthState`], derived on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthPhase {
    /// Not logged in, no error recorded.
    Anonymous,
    /// An operation is in flight.
    Authenticating,
    /// Logged in with a token.
    Authenticated,
    /// Not logged in, with the last failure attached.
    Failed,
}

// ---------------------------------------------------------------------------
// AuthState
// ---------------------------------------------------------------------------

/// The client's authentication state.
///
/// Serialized with camelCase names (`isAuthenticated`, `isLoading`, ...)
/// for UI consumers.
///
/// Invariant: `is_authenticated` implies `token.is_some()`. Every
/// transition below preserves it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub is_authenticated: bool,
    pub is_loading: bool,
    pub user: Option<Value>,
    pub token: Option<String>,
    pub error: Option<ErrorPayload>,
}

impl AuthState {
    /// Startup state from a persisted token.
    ///
    /// `claims_decodable` says whether the token's claims could be read.
    /// Expiry is not checked here; that waits for an explicit session check.
    pub fn restored(token: Option<String>, claims_decodable: bool) -> Self {
        Self {
            is_authenticated: token.is_some() && claims_decodable,
            token,
            ..Self::default()
        }
    }

    pub fn phase(&self) -> AuthPhase {
        if self.is_loading {
            AuthPhase::Authenticating
        } else if self.is_authenticated {
            AuthPhase::Authenticated
        } else if self.error.is_some() {
            AuthPhase::Failed
        } else {
            AuthPhase::Anonymous
        }
    }

    /// An operation has started.
    pub fn begin(&mut self) {
        self.is_loading = true;
    }

    pub fn apply_register(&mut self, outcome: &Result<Value, Rejected>) {
        self.is_loading = false;
        match outcome {
            Ok(_) => self.error = None,
            Err(rejected) => self.error = Some(rejected.payload.clone()),
        }
    }

    /// The service's `success` flag is taken verbatim, except that a
    /// response without a token never authenticates. An empty token counts
    /// as no token.
    pub fn apply_login(&mut self, outcome: &Result<LoginResponse, Rejected>) {
        self.is_loading = false;
        match outcome {
            Ok(response) => {
                self.user = present_user(response.user.as_ref());
                self.token = response.token.clone().filter(|token| !token.is_empty());
                self.is_authenticated = self.authenticated_if(response.success);
                self.error = None;
            }
            Err(rejected) => {
                self.user = None;
                self.is_authenticated = false;
                self.token = None;
                self.error = Some(rejected.payload.clone());
            }
        }
    }

    pub fn apply_logout(
        &mut self,
        outcome: &Result<Value, Rejected>,
        on_failure: LogoutFailure,
    ) {
        self.is_loading = false;
        match outcome {
            Ok(_) => {
                self.clear_credentials();
                self.error = None;
            }
            Err(rejected) => {
                if on_failure == LogoutFailure::ClearSession {
                    self.clear_credentials();
                }
                self.error = Some(rejected.payload.clone());
            }
        }
    }

    /// The token field is left as it was; only the verdict and the user
    /// change.
    pub fn apply_check_auth(&mut self, outcome: &Result<SessionResponse, Rejected>) {
        self.is_loading = false;
        match outcome {
            Ok(response) => {
                self.user = present_user(response.user.as_ref());
                self.is_authenticated = self.authenticated_if(response.success);
                self.error = None;
            }
            Err(rejected) => {
                self.user = None;
                self.is_authenticated = false;
                self.error = Some(rejected.payload.clone());
            }
        }
    }

    /// Drops credentials. Leaves `error` and `is_loading` alone.
    pub fn reset(&mut self) {
        self.clear_credentials();
    }

    fn clear_credentials(&mut self) {
        self.is_authenticated = false;
        self.user = None;
        self.token = None;
    }

    fn authenticated_if(&self, success: bool) -> bool {
        if success && self.token.is_none() {
            tracing::warn!("service reported success without a token; staying unauthenticated");
            return false;
        }
        success
    }
}

/// The service's user value, with JSON falsy values (`null`, `false`, `0`,
/// `""`) read as no user.
fn present_user(user: Option<&Value>) -> Option<Value> {
    user.filter(|value| match value {
            Value::Null => false,
            Value::Bool(flag) => *flag,
            Value::Number(n) => n.as_f64() != Some(0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        })
        .cloned()
}
