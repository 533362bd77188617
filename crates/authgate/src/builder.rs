//! `AuthClientBuilder`: wires an HTTP service and a session store into an
//! [`AuthController`].

use std::path::PathBuf;
use std::time::Duration;

use authgate_session::{
    AuthController, ControllerConfig, FileSessionStore, LogoutFailure,
    MemorySessionStore, SessionStore, StalePolicy, StoreError,
};
use authgate_transport::{HttpAuthService, HttpConfig};

use crate::{AuthgateError, ClientConfig};

/// An auth controller talking HTTP.
pub type AuthClient<S = SessionBackend> = AuthController<HttpAuthService, S>;

/// The session store picked at runtime, from configuration.
#[derive(Debug)]
pub enum SessionBackend {
    Memory(MemorySessionStore),
    File(FileSessionStore),
}

impl SessionStore for SessionBackend {
    fn get_item(&self, key: &str) -> Result<Option<String>, StoreError> {
        match self {
            Self::Memory(store) => store.get_item(key),
            Self::File(store) => store.get_item(key),
        }
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.set_item(key, value),
            Self::File(store) => store.set_item(key, value),
        }
    }

    fn remove_item(&self, key: &str) -> Result<(), StoreError> {
        match self {
            Self::Memory(store) => store.remove_item(key),
            Self::File(store) => store.remove_item(key),
        }
    }
}

/// Builder for an [`AuthClient`].
///
/// # Example
///
/// ```rust,no_run
/// use authgate::prelude::*;
///
/// # async fn run() -> Result<(), AuthgateError> {
/// let client = AuthClientBuilder::new()
///     .base_url("http://localhost:5000")
///     .session_file("/tmp/authgate/session.json")
///     .build()?;
///
/// client.check_auth().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct AuthClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    session_file: Option<PathBuf>,
    controller: ControllerConfig,
}

impl AuthClientBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from a loaded [`ClientConfig`].
    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new()
            .base_url(&config.api_url)
            .timeout(config.timeout)
            .token_key(&config.token_key)
            .maybe_session_file(config.session_file.clone())
    }

    /// Root URL of the auth service. Required.
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Persists the session in `path` instead of in memory.
    pub fn session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Keeps the session in memory (the default).
    pub fn memory_store(mut self) -> Self {
        self.session_file = None;
        self
    }

    fn maybe_session_file(mut self, path: Option<PathBuf>) -> Self {
        self.session_file = path;
        self
    }

    pub fn token_key(mut self, key: &str) -> Self {
        self.controller.token_key = key.to_string();
        self
    }

    pub fn stale_completions(mut self, policy: StalePolicy) -> Self {
        self.controller.stale_completions = policy;
        self
    }

    pub fn logout_failure(mut self, on_failure: LogoutFailure) -> Self {
        self.controller.logout_failure = on_failure;
        self
    }

    /// Replaces the whole controller configuration.
    pub fn controller_config(mut self, config: ControllerConfig) -> Self {
        self.controller = config;
        self
    }

    /// Builds a client over the configured store: the session file if one
    /// was given, memory otherwise.
    ///
    /// # Errors
    /// [`AuthgateError::Config`] if no base URL was set,
    /// [`AuthgateError::Transport`] if it is invalid.
    pub fn build(mut self) -> Result<AuthClient, AuthgateError> {
        let store = match self.session_file.take() {
            Some(path) => SessionBackend::File(FileSessionStore::new(path)),
            None => SessionBackend::Memory(MemorySessionStore::new()),
        };
        self.build_with_store(store)
    }

    /// Builds a client over a caller-supplied store.
    pub fn build_with_store<S: SessionStore>(
        self,
        store: S,
    ) -> Result<AuthClient<S>, AuthgateError> {
        let base_url = self
            .base_url
            .ok_or_else(|| AuthgateError::Config("base URL not set".into()))?;
        let mut http = HttpConfig::new(&base_url)?;
        if let Some(timeout) = self.timeout {
            http = http.with_timeout(timeout);
        }
        let service = HttpAuthService::new(&http)?;

        tracing::info!(%base_url, token_key = %self.controller.token_key, "auth client built");
        Ok(AuthController::new(service, store, self.controller))
    }
}
