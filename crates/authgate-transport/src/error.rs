/// Errors that can occur while setting up the HTTP transport.
///
/// Request-time failures are not here: they surface as
/// [`ServiceError`](authgate_protocol::ServiceError) through the
/// `AuthServiceClient` methods.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The base URL could not be parsed.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    /// The base URL parsed but cannot carry API paths (e.g. `mailto:`).
    #[error("base URL cannot be a base: {0}")]
    NotABase(String),

    /// Building the underlying HTTP client failed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
}
