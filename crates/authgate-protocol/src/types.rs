//! Response bodies and error values exchanged with the auth service.
//!
//! The service speaks JSON. User profiles and error bodies are treated as
//! opaque `serde_json::Value`s: the client stores and hands them back to the
//! UI, it never interprets them.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// The four asynchronous operations the client performs against the service.
///
/// Each operation has a fixed fallback message, used as the rejection
/// payload when a failure carries no body from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Register,
    Login,
    Logout,
    CheckAuth,
}

impl Operation {
    /// Every operation kind, in a stable order.
    pub const ALL: [Operation; 4] = [
        Operation::Register,
        Operation::Login,
        Operation::Logout,
        Operation::CheckAuth,
    ];

    /// The message used when a failure carries no service payload.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::Register => "Registration failed.",
            Self::Login => "Login failed.",
            Self::Logout => "Logout failed.",
            Self::CheckAuth => "Authentication failed.",
        }
    }

    /// Position of this operation in [`Operation::ALL`].
    pub fn index(self) -> usize {
        match self {
            Self::Register => 0,
            Self::Login => 1,
            Self::Logout => 2,
            Self::CheckAuth => 3,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register => write!(f, "register"),
            Self::Login => write!(f, "login"),
            Self::Logout => write!(f, "logout"),
            Self::CheckAuth => write!(f, "check_auth"),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorPayload
// ---------------------------------------------------------------------------

/// The error value recorded in auth state after a failure.
///
/// Either a plain message (the fixed fallback strings, or a service that
/// answered with a bare JSON string) or a structured body from the service,
/// such as `{"message": "bad credentials"}`.
///
/// `#[serde(untagged)]` means there is no wrapper on the wire: a string
/// deserializes to `Message`, anything else to `Body`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorPayload {
    Message(String),
    Body(Value),
}

impl ErrorPayload {
    /// Builds a payload from a service body, unwrapping bare JSON strings.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::String(s) => Self::Message(s),
            other => Self::Body(other),
        }
    }

    /// The human-readable message, if one can be found.
    ///
    /// For structured bodies this looks at a top-level `"message"` field.
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Message(s) => Some(s),
            Self::Body(body) => body.get("message").and_then(Value::as_str),
        }
    }
}

impl From<&str> for ErrorPayload {
    fn from(message: &str) -> Self {
        Self::Message(message.to_string())
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.message(), self) {
            (Some(message), _) => write!(f, "{message}"),
            (None, Self::Body(body)) => write!(f, "{body}"),
            (None, Self::Message(_)) => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Body of a successful login call.
///
/// `success` is the service's own verdict and is trusted verbatim: an HTTP
/// 200 with `success: false` is a completed login that did not authenticate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<Value>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Body of a successful session check.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub user: Option<Value>,
}
