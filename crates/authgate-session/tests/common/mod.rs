//! Shared fixtures for the controller integration tests.
//!
//! [`ScriptedService`] is a fake auth service: each call pops the next
//! scripted answer for its operation and records what it was asked. A
//! scripted answer can be held back behind a [`Notify`] gate, which is how
//! tests keep a call in flight.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use authgate_protocol::{LoginResponse, ServiceError, SessionResponse};
use authgate_session::{
    AuthController, AuthServiceClient, ControllerConfig, MemorySessionStore,
    SessionStore,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde_json::{Value, json};
use tokio::sync::Notify;

// =========================================================================
// Scripted service
// =========================================================================

/// One scripted answer.
pub struct Step<T> {
    result: Result<T, ServiceError>,
    gate: Option<Arc<Notify>>,
}

impl<T> Step<T> {
    pub fn ok(value: T) -> Self {
        Self { result: Ok(value), gate: None }
    }

    pub fn err(error: ServiceError) -> Self {
        Self { result: Err(error), gate: None }
    }

    /// Holds the answer until `gate` is notified.
    pub fn gated(mut self, gate: &Arc<Notify>) -> Self {
        self.gate = Some(Arc::clone(gate));
        self
    }

    async fn run(self) -> Result<T, ServiceError> {
        if let Some(gate) = self.gate {
            gate.notified().await;
        }
        self.result
    }
}

#[derive(Default)]
struct Script {
    register: VecDeque<Step<Value>>,
    login: VecDeque<Step<LoginResponse>>,
    logout: VecDeque<Step<Value>>,
    check_session: VecDeque<Step<SessionResponse>>,
}

/// A call the controller made.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Register(Value),
    Login(Value),
    Logout,
    CheckSession(String),
}

#[derive(Clone, Default)]
pub struct ScriptedService {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<Call>>>,
}

impl ScriptedService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_register(&self, step: Step<Value>) {
        self.script.lock().unwrap().register.push_back(step);
    }

    pub fn push_login(&self, step: Step<LoginResponse>) {
        self.script.lock().unwrap().login.push_back(step);
    }

    pub fn push_logout(&self, step: Step<Value>) {
        self.script.lock().unwrap().logout.push_back(step);
    }

    pub fn push_check_session(&self, step: Step<SessionResponse>) {
        self.script.lock().unwrap().check_session.push_back(step);
    }

    /// Drops every answer not yet consumed.
    pub fn clear_script(&self) {
        *self.script.lock().unwrap() = Script::default();
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn next<T>(
        &self,
        pick: impl FnOnce(&mut Script) -> &mut VecDeque<Step<T>>,
    ) -> Step<T> {
        let mut script = self.script.lock().unwrap();
        pick(&mut script)
            .pop_front()
            .unwrap_or_else(|| Step::err(ServiceError::Network("nothing scripted".into())))
    }
}

impl AuthServiceClient for ScriptedService {
    async fn register(&self, payload: &Value) -> Result<Value, ServiceError> {
        self.record(Call::Register(payload.clone()));
        self.next(|s| &mut s.register).run().await
    }

    async fn login(&self, payload: &Value) -> Result<LoginResponse, ServiceError> {
        self.record(Call::Login(payload.clone()));
        self.next(|s| &mut s.login).run().await
    }

    async fn logout(&self) -> Result<Value, ServiceError> {
        self.record(Call::Logout);
        self.next(|s| &mut s.logout).run().await
    }

    async fn check_session(&self, token: &str) -> Result<SessionResponse, ServiceError> {
        self.record(Call::CheckSession(token.to_string()));
        self.next(|s| &mut s.check_session).run().await
    }
}

// =========================================================================
// Helpers
// =========================================================================

pub type TestController = AuthController<ScriptedService, Arc<MemorySessionStore>>;

pub fn controller(
    service: &ScriptedService,
    store: &Arc<MemorySessionStore>,
) -> TestController {
    controller_with(service, store, ControllerConfig::default())
}

pub fn controller_with(
    service: &ScriptedService,
    store: &Arc<MemorySessionStore>,
    config: ControllerConfig,
) -> TestController {
    AuthController::new(service.clone(), Arc::clone(store), config)
}

/// An unsigned compact JWT with the given `exp`.
pub fn jwt(exp: impl Into<Value>) -> String {
    let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#);
    let claims = URL_SAFE_NO_PAD.encode(json!({"exp": exp.into(), "sub": "u-1"}).to_string());
    format!("{header}.{claims}.")
}

pub fn fresh_jwt() -> String {
    jwt(chrono::Utc::now().timestamp() + 3600)
}

pub fn expired_jwt() -> String {
    jwt(chrono::Utc::now().timestamp() - 3600)
}

/// Writes `token` into the store the way the controller would.
pub fn persist(store: &MemorySessionStore, token: &str) {
    store
        .set_item("token", &serde_json::to_string(token).unwrap())
        .unwrap();
}

/// The raw stored value under the default key.
pub fn stored(store: &MemorySessionStore) -> Option<String> {
    store.get_item("token").unwrap()
}

pub fn rejected(status: u16, payload: Option<Value>) -> ServiceError {
    ServiceError::Rejected { status, payload }
}

pub fn login_ok(user: Value, token: &str) -> LoginResponse {
    LoginResponse {
        success: true,
        user: Some(user),
        token: Some(token.to_string()),
    }
}
