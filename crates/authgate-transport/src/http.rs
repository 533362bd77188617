//! [`AuthServiceClient`] over HTTP, using `reqwest`.
//!
//! | Operation       | Request                          |
//! |-----------------|----------------------------------|
//! | `register`      | `POST {base}/api/auth/register`  |
//! | `login`         | `POST {base}/api/auth/login`     |
//! | `logout`        | `POST {base}/api/auth/logout`    |
//! | `check_session` | `GET {base}/api/auth/check-auth` with `Authorization: Bearer` |
//!
//! The client keeps a cookie jar, so a session cookie set by `login` is
//! sent back on later calls.

use authgate_protocol::{LoginResponse, Operation, ServiceError, SessionResponse};
use authgate_session::AuthServiceClient;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::{HttpConfig, TransportError};

#[derive(Debug, Clone)]
struct Endpoints {
    register: Url,
    login: Url,
    logout: Url,
    check_auth: Url,
}

/// The auth service, reached over HTTP.
///
/// Cloning is cheap and clones share the connection pool and cookie jar.
#[derive(Debug, Clone)]
pub struct HttpAuthService {
    http: reqwest::Client,
    endpoints: Endpoints,
}

impl HttpAuthService {
    /// Builds the HTTP client and resolves every endpoint up front.
    ///
    /// # Errors
    /// [`TransportError::Client`] if the TLS backend cannot be initialized,
    /// [`TransportError::NotABase`] if the base URL cannot carry a path.
    pub fn new(config: &HttpConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .cookie_store(true)
            .build()
            .map_err(TransportError::Client)?;

        let endpoints = Endpoints {
            register: config.endpoint("register")?,
            login: config.endpoint("login")?,
            logout: config.endpoint("logout")?,
            check_auth: config.endpoint("check-auth")?,
        };
        tracing::debug!(base_url = %config.base_url, timeout = ?config.timeout, "HTTP auth service ready");

        Ok(Self { http, endpoints })
    }
}

impl AuthServiceClient for HttpAuthService {
    async fn register(&self, payload: &Value) -> Result<Value, ServiceError> {
        let request = self.http.post(self.endpoints.register.clone()).json(payload);
        send(Operation::Register, request).await
    }

    async fn login(&self, payload: &Value) -> Result<LoginResponse, ServiceError> {
        let request = self.http.post(self.endpoints.login.clone()).json(payload);
        send(Operation::Login, request).await
    }

    async fn logout(&self) -> Result<Value, ServiceError> {
        let request = self.http.post(self.endpoints.logout.clone()).json(&json!({}));
        send(Operation::Logout, request).await
    }

    async fn check_session(&self, token: &str) -> Result<SessionResponse, ServiceError> {
        let request = self
            .http
            .get(self.endpoints.check_auth.clone())
            .bearer_auth(token);
        send(Operation::CheckAuth, request).await
    }
}

/// Sends `request` and decodes a 2xx body as `T`.
///
/// An empty 2xx body decodes as JSON `null`.
async fn send<T: DeserializeOwned>(
    op: Operation,
    request: reqwest::RequestBuilder,
) -> Result<T, ServiceError> {
    let response = request.send().await.map_err(|e| network(op, &e))?;
    let status = response.status();

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::debug!(%op, status = status.as_u16(), body_len = body.len(), "service rejected request");
        return Err(ServiceError::Rejected {
            status: status.as_u16(),
            payload: error_payload(&body),
        });
    }

    let bytes = response.bytes().await.map_err(|e| network(op, &e))?;
    let body: &[u8] = if bytes.is_empty() { b"null" } else { &bytes };
    serde_json::from_slice(body).map_err(|e| {
        tracing::warn!(%op, error = %e, "malformed response body");
        ServiceError::Network(format!("malformed response: {e}"))
    })
}

/// The payload carried by a non-2xx body.
///
/// JSON is kept as is. Other non-empty text becomes a JSON string, and an
/// empty body carries no payload.
fn error_payload(body: &str) -> Option<Value> {
    if body.trim().is_empty() {
        return None;
    }
    Some(serde_json::from_str(body).unwrap_or_else(|_| Value::String(body.to_string())))
}

fn network(op: Operation, error: &reqwest::Error) -> ServiceError {
    tracing::debug!(%op, error = %error, timeout = error.is_timeout(), "request failed");
    if error.is_timeout() {
        ServiceError::Network("request timed out".into())
    } else {
        ServiceError::Network(error.to_string())
    }
}
