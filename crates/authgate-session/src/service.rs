//! The remote auth service, as the controller sees it.
//!
//! Authgate doesn't care how the service is reached. The controller only
//! needs something that implements [`AuthServiceClient`]: the HTTP client
//! in `authgate-transport` in production, a scripted fake in tests.

use std::future::Future;

use authgate_protocol::{LoginResponse, ServiceError, SessionResponse};
use serde_json::Value;

/// The four calls the controller makes against the auth service.
///
/// Payloads are opaque JSON and passed through unchanged. Every method
/// resolves to the service's response body or a [`ServiceError`]; the
/// controller turns the latter into a rejection.
///
/// # Example
///
/// ```rust
/// use authgate_protocol::{LoginResponse, ServiceError, SessionResponse};
/// use authgate_session::AuthServiceClient;
/// use serde_json::{json, Value};
///
/// /// Accepts every login and every session.
/// struct OpenDoor;
///
/// impl AuthServiceClient for OpenDoor {
///     async fn register(&self, _payload: &Value) -> Result<Value, ServiceError> {
///         Ok(json!({"success": true}))
///     }
///
///     async fn login(&self, _payload: &Value) -> Result<LoginResponse, ServiceError> {
///         Ok(LoginResponse {
///             success: true,
///             user: Some(json!({"id": 1})),
///             token: Some("opaque".into()),
///         })
///     }
///
///     async fn logout(&self) -> Result<Value, ServiceError> {
///         Ok(json!({"success": true}))
///     }
///
///     async fn check_session(&self, _token: &str) -> Result<SessionResponse, ServiceError> {
///         Ok(SessionResponse { success: true, user: None })
///     }
/// }
/// ```
pub trait AuthServiceClient: Send + Sync + 'static {
    /// Creates an account. Registration does not log the user in.
    fn register(
        &self,
        payload: &Value,
    ) -> impl Future<Output = Result<Value, ServiceError>> + Send;

    /// Exchanges credentials for a token and user profile.
    fn login(
        &self,
        payload: &Value,
    ) -> impl Future<Output = Result<LoginResponse, ServiceError>> + Send;

    /// Ends the server-side session.
    fn logout(&self) -> impl Future<Output = Result<Value, ServiceError>> + Send;

    /// Validates `token`, sent as a bearer credential.
    fn check_session(
        &self,
        token: &str,
    ) -> impl Future<Output = Result<SessionResponse, ServiceError>> + Send;
}
