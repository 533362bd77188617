//! Controller configuration.

use serde::{Deserialize, Serialize};

/// What to do with a completion that is no longer the newest invocation of
/// its operation kind.
///
/// Every operation kind (register, login, logout, check-auth) has its own
/// generation counter, bumped each time the operation is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Apply every completion as it arrives. The last one to resolve wins,
    /// even if it belongs to an older invocation.
    #[default]
    Apply,

    /// Apply only the completion of the newest invocation. Older ones still
    /// resolve for their callers but leave state and storage alone.
    Discard,
}

/// What a failed logout does to the local session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogoutFailure {
    /// Record the error; user, token, and the authenticated flag stay as
    /// they were. The server session may still be alive.
    #[default]
    KeepSession,

    /// Record the error and drop local credentials anyway, the same as a
    /// successful logout.
    ClearSession,
}

/// Configuration for an [`AuthController`](crate::AuthController).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ControllerConfig {
    /// Session-store key the token is persisted under.
    ///
    /// Default: `"token"`.
    pub token_key: String,

    /// Default: [`StalePolicy::Apply`].
    pub stale_completions: StalePolicy,

    /// Default: [`LogoutFailure::KeepSession`].
    pub logout_failure: LogoutFailure,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            token_key: "token".to_string(),
            stale_completions: StalePolicy::default(),
            logout_failure: LogoutFailure::default(),
        }
    }
}
