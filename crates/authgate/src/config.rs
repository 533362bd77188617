//! Client configuration from the environment.
//!
//! | Variable                | Required | Default  |
//! |-------------------------|----------|----------|
//! | `AUTHGATE_API_URL`      | yes      |          |
//! | `AUTHGATE_TIMEOUT_SECS` | no       | `30`     |
//! | `AUTHGATE_SESSION_FILE` | no       | in-memory session store |
//! | `AUTHGATE_TOKEN_KEY`    | no       | `token`  |

use std::path::PathBuf;
use std::time::Duration;

use authgate_transport::DEFAULT_TIMEOUT;

use crate::AuthgateError;

pub const API_URL_VAR: &str = "AUTHGATE_API_URL";
pub const TIMEOUT_VAR: &str = "AUTHGATE_TIMEOUT_SECS";
pub const SESSION_FILE_VAR: &str = "AUTHGATE_SESSION_FILE";
pub const TOKEN_KEY_VAR: &str = "AUTHGATE_TOKEN_KEY";

/// Everything needed to build an auth client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Root URL of the auth service.
    pub api_url: String,
    pub timeout: Duration,
    /// Where to persist the session. `None` keeps it in memory.
    pub session_file: Option<PathBuf>,
    /// Session store key the token lives under.
    pub token_key: String,
}

impl ClientConfig {
    /// A config with defaults for everything but the URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout: DEFAULT_TIMEOUT,
            session_file: None,
            token_key: "token".to_string(),
        }
    }

    /// Reads the `AUTHGATE_*` variables from the process environment.
    ///
    /// # Errors
    /// [`AuthgateError::Config`] if the URL is missing or the timeout is
    /// not a whole number of seconds.
    pub fn from_env() -> Result<Self, AuthgateError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Like [`from_env`](Self::from_env), reading variables through `lookup`.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, AuthgateError> {
        let set = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let api_url = set(API_URL_VAR)
            .ok_or_else(|| AuthgateError::Config(format!("{API_URL_VAR} is not set")))?;
        let mut config = Self::new(api_url);

        if let Some(raw) = set(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                AuthgateError::Config(format!(
                    "{TIMEOUT_VAR} must be a whole number of seconds, got {raw:?}"
                ))
            })?;
            config.timeout = Duration::from_secs(secs);
        }
        config.session_file = set(SESSION_FILE_VAR).map(PathBuf::from);
        if let Some(key) = set(TOKEN_KEY_VAR) {
            config.token_key = key;
        }

        tracing::debug!(
            api_url = %config.api_url,
            timeout = ?config.timeout,
            file_store = config.session_file.is_some(),
            "client config loaded"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup_only_url_uses_defaults() {
        let config =
            ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "http://localhost:5000")]))
                .unwrap();

        assert_eq!(config, ClientConfig::new("http://localhost:5000"));
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.token_key, "token");
    }

    #[test]
    fn test_from_lookup_reads_every_variable() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "https://auth.example.com"),
            (TIMEOUT_VAR, "5"),
            (SESSION_FILE_VAR, "/tmp/authgate/session.json"),
            (TOKEN_KEY_VAR, "auth.token"),
        ]))
        .unwrap();

        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(
            config.session_file,
            Some(PathBuf::from("/tmp/authgate/session.json"))
        );
        assert_eq!(config.token_key, "auth.token");
    }

    #[test]
    fn test_from_lookup_missing_url_is_error() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();

        assert!(matches!(err, AuthgateError::Config(ref msg) if msg.contains(API_URL_VAR)));
    }

    #[test]
    fn test_from_lookup_blank_url_is_error() {
        let result = ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "  ")]));

        assert!(matches!(result, Err(AuthgateError::Config(_))));
    }

    #[test]
    fn test_from_lookup_bad_timeout_is_error() {
        let result = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, "http://localhost"),
            (TIMEOUT_VAR, "soon"),
        ]));

        assert!(matches!(result, Err(AuthgateError::Config(ref msg)) if msg.contains("soon")));
    }
}
