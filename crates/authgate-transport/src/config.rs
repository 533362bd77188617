//! HTTP transport configuration.

use std::time::Duration;

use url::Url;

use crate::TransportError;

/// Request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Where the auth service lives and how long to wait for it.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Root of the service. Endpoint paths (`api/auth/...`) are appended
    /// to whatever path it already has.
    pub base_url: Url,
    /// Applied to every request, connect through body.
    pub timeout: Duration,
}

impl HttpConfig {
    /// Parses `base_url` and uses [`DEFAULT_TIMEOUT`].
    ///
    /// # Errors
    /// - [`TransportError::InvalidBaseUrl`] if `base_url` does not parse
    /// - [`TransportError::NotABase`] if it cannot carry a path
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(TransportError::NotABase(base_url.to_string()));
        }
        Ok(Self {
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The URL of `api/auth/{name}` under the base URL.
    pub(crate) fn endpoint(&self, name: &str) -> Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| TransportError::NotABase(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(["api", "auth", name]);
        Ok(url)
    }
}
