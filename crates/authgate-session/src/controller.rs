//! The auth controller: owns the state and drives it through operations.
//!
//! This is the central piece of the session layer. It's responsible for:
//! - Marking state as loading while a call is in flight
//! - Calling the [`AuthServiceClient`] and mapping failures to rejections
//! - Applying the matching [`AuthState`] transition on completion
//! - Keeping the persisted token in step with `state.token`
//!
//! # Concurrency note
//!
//! Every method takes `&self`. The state lives in a `tokio::sync::watch`
//! sender and each transition is a single `send_modify`, so an observer
//! never sees half of one. Session-store writes run inside that same
//! `send_modify`, which keeps the stored token and `state.token` in step
//! when completions race on a multi-thread runtime. No lock is held across
//! an `.await`.
//!
//! Operations are not serialized against each other. Two logins in flight
//! both complete; with [`StalePolicy::Apply`] the last one to resolve wins,
//! with [`StalePolicy::Discard`] only the newest invocation is applied.

use std::sync::atomic::{AtomicU64, Ordering};

use authgate_protocol::{
    JwtDecoder, LoginResponse, Operation, SessionResponse, TokenDecoder,
};
use serde_json::Value;
use tokio::sync::watch;

use crate::{
    AuthError, AuthServiceClient, AuthState, ControllerConfig, LogoutFailure,
    Rejected, SessionStore, StalePolicy, TokenStore,
};

/// Drives an [`AuthState`] through register, login, logout, and session
/// checks against an auth service, persisting the token in a session store.
///
/// ## Lifecycle
///
/// ```text
/// new() ──→ restores token from store (Authenticated if decodable)
///   │
///   ├── register() ──→ error cleared or set, nothing else
///   ├── login()    ──→ user + token (+ store) on success
///   ├── check_auth() → store token → local expiry check → service
///   ├── logout()   ──→ credentials (+ store) cleared on success
///   └── reset_token_and_credentials() ──→ credentials (+ store) cleared
/// ```
pub struct AuthController<C, S, D = JwtDecoder> {
    client: C,
    tokens: TokenStore<S>,
    decoder: D,
    config: ControllerConfig,
    state: watch::Sender<AuthState>,

    /// One counter per [`Operation`], indexed by [`Operation::index`].
    generations: [AtomicU64; 4],
}

impl<C, S> AuthController<C, S, JwtDecoder>
where
    C: AuthServiceClient,
    S: SessionStore,
{
    /// Creates a controller that reads tokens as JWTs.
    ///
    /// Reads the persisted token (if any) to build the initial state.
    pub fn new(client: C, store: S, config: ControllerConfig) -> Self {
        Self::with_decoder(client, store, JwtDecoder, config)
    }
}

impl<C, S, D> AuthController<C, S, D>
where
    C: AuthServiceClient,
    S: SessionStore,
    D: TokenDecoder,
{
    /// Creates a controller with a custom token decoder.
    pub fn with_decoder(
        client: C,
        store: S,
        decoder: D,
        config: ControllerConfig,
    ) -> Self {
        let tokens = TokenStore::new(store, config.token_key.clone());
        let initial = restore_state(&tokens, &decoder);
        tracing::info!(
            authenticated = initial.is_authenticated,
            "auth state restored"
        );
        let (state, _) = watch::channel(initial);

        Self {
            client,
            tokens,
            decoder,
            config,
            state,
            generations: Default::default(),
        }
    }

    // =====================================================================
    // Observation
    // =====================================================================

    /// A copy of the current state.
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    /// A receiver that sees every transition from now on.
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn session_store(&self) -> &S {
        self.tokens.inner()
    }

    // =====================================================================
    // Operations
    // =====================================================================

    /// Registers an account. Does not log in.
    ///
    /// # Errors
    /// Returns [`Rejected`] with the service's payload, or
    /// "Registration failed." when there is none.
    pub async fn register(&self, payload: &Value) -> Result<Value, Rejected> {
        let op = Operation::Register;
        let generation = self.begin(op);

        let outcome = self
            .client
            .register(payload)
            .await
            .map_err(|e| Rejected::new(op, e.into()));

        if self.is_applicable(op, generation) {
            self.state.send_modify(|state| state.apply_register(&outcome));
        }
        log_outcome(op, &outcome);
        outcome
    }

    /// Logs in, persisting the returned token on success.
    ///
    /// A failed login leaves the session store untouched.
    ///
    /// # Errors
    /// Returns [`Rejected`] with the service's payload, or "Login failed."
    pub async fn login(&self, payload: &Value) -> Result<LoginResponse, Rejected> {
        let op = Operation::Login;
        let generation = self.begin(op);

        let outcome = self
            .client
            .login(payload)
            .await
            .map_err(|e| Rejected::new(op, e.into()));

        if self.is_applicable(op, generation) {
            self.state.send_modify(|state| {
                if let Ok(response) = &outcome {
                    match response.token.as_deref().filter(|token| !token.is_empty()) {
                        Some(token) => self.persist(token),
                        None => self.clear_persisted(),
                    }
                }
                state.apply_login(&outcome);
            });
        }
        log_outcome(op, &outcome);
        outcome
    }

    /// Logs out, clearing credentials and the persisted token on success.
    ///
    /// On failure the local session is kept or dropped according to
    /// [`ControllerConfig::logout_failure`].
    ///
    /// # Errors
    /// Returns [`Rejected`] with the service's payload, or "Logout failed."
    pub async fn logout(&self) -> Result<Value, Rejected> {
        let op = Operation::Logout;
        let generation = self.begin(op);

        let outcome = self
            .client
            .logout()
            .await
            .map_err(|e| Rejected::new(op, e.into()));

        if self.is_applicable(op, generation) {
            let on_failure = self.config.logout_failure;
            self.state.send_modify(|state| {
                if outcome.is_ok() || on_failure == LogoutFailure::ClearSession {
                    self.clear_persisted();
                }
                state.apply_logout(&outcome, on_failure);
            });
        }
        log_outcome(op, &outcome);
        outcome
    }

    /// Validates the persisted token.
    ///
    /// The token is read from the session store and its claims checked
    /// locally first. A missing, undecodable, or expired token fails
    /// without any network call. Otherwise the service is asked.
    ///
    /// # Errors
    /// - "No token found." — nothing persisted
    /// - "Authentication failed." — undecodable/expired token, or a service
    ///   failure without a payload
    /// - the service's payload, when it sent one
    pub async fn check_auth(&self) -> Result<SessionResponse, Rejected> {
        let op = Operation::CheckAuth;
        let generation = self.begin(op);

        let outcome = match self.usable_token() {
            Ok(token) => self
                .client
                .check_session(&token)
                .await
                .map_err(AuthError::from),
            Err(e) => {
                tracing::debug!(error = %e, "session check stopped before request");
                Err(e)
            }
        }
        .map_err(|e| Rejected::new(op, e));

        if self.is_applicable(op, generation) {
            self.state.send_modify(|state| state.apply_check_auth(&outcome));
        }
        log_outcome(op, &outcome);
        outcome
    }

    /// Drops credentials and the persisted token, without a network call.
    ///
    /// Leaves `error` and `is_loading` as they are. Idempotent.
    pub fn reset_token_and_credentials(&self) {
        self.state.send_modify(|state| {
            self.clear_persisted();
            state.reset();
        });
        tracing::info!("credentials reset");
    }

    // =====================================================================
    // Internals
    // =====================================================================

    /// Marks `op` as in flight and returns its generation.
    fn begin(&self, op: Operation) -> u64 {
        let generation =
            self.generations[op.index()].fetch_add(1, Ordering::SeqCst) + 1;
        self.state.send_modify(AuthState::begin);
        tracing::debug!(%op, generation, "operation started");
        generation
    }

    fn is_applicable(&self, op: Operation, generation: u64) -> bool {
        match self.config.stale_completions {
            StalePolicy::Apply => true,
            StalePolicy::Discard => {
                let newest = self.generations[op.index()].load(Ordering::SeqCst);
                if newest != generation {
                    tracing::debug!(
                        %op,
                        generation,
                        newest,
                        "discarding stale completion"
                    );
                }
                newest == generation
            }
        }
    }

    /// The persisted token, if it exists and has not expired.
    fn usable_token(&self) -> Result<String, AuthError> {
        let token = self.tokens.get()?.ok_or(AuthError::NoToken)?;
        let claims = self.decoder.decode(&token)?;
        if claims.is_expired_at(chrono::Utc::now().timestamp()) {
            return Err(AuthError::TokenExpired { exp: claims.exp });
        }
        Ok(token)
    }

    // Store writes happen inside `send_modify`, under the watch lock, so
    // the persisted token and `state.token` change together. Store failures
    // never fail an operation; state is still updated.

    fn persist(&self, token: &str) {
        if let Err(e) = self.tokens.set(token) {
            tracing::warn!(error = %e, "failed to persist token");
        }
    }

    fn clear_persisted(&self) {
        if let Err(e) = self.tokens.remove() {
            tracing::warn!(error = %e, "failed to remove persisted token");
        }
    }
}

/// Builds the startup state from whatever the store holds.
fn restore_state<S: SessionStore, D: TokenDecoder>(
    tokens: &TokenStore<S>,
    decoder: &D,
) -> AuthState {
    match tokens.get() {
        Ok(Some(token)) => {
            let decodable = match decoder.decode(&token) {
                Ok(_) => true,
                Err(e) => {
                    tracing::warn!(error = %e, "persisted token has unreadable claims");
                    false
                }
            };
            AuthState::restored(Some(token), decodable)
        }
        Ok(None) => AuthState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unreadable persisted token");
            AuthState::default()
        }
    }
}

fn log_outcome<T>(op: Operation, outcome: &Result<T, Rejected>) {
    match outcome {
        Ok(_) => tracing::info!(%op, "operation succeeded"),
        Err(rejected) => tracing::info!(
            %op,
            error = %rejected.error,
            local = rejected.error.is_local(),
            "operation rejected"
        ),
    }
}
