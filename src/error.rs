use std::sync::Arc;

use thiserror::Error;

/// Result type returned by the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by [`DirectusClient`](crate::DirectusClient) and its transport.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// A verb was executed before an endpoint was selected.
    #[error("no endpoint selected")]
    NoEndpoint,
    /// A placeholder of the selected endpoint has no bound value.
    #[error("endpoint `{template}` has no value bound for `:{name}`")]
    UnresolvedParameter {
        /// The selected endpoint template.
        template: String,
        /// Placeholder name, without the leading `:`.
        name: String,
    },
    /// A bound value turns a path segment into `""`, `.` or `..`, which would address a different
    /// resource.
    #[error("`:{name}` of endpoint `{template}` resolves to the path segment `{segment}`")]
    InvalidParameter {
        /// The selected endpoint template.
        template: String,
        /// Placeholder name, without the leading `:`.
        name: String,
        /// The resolved segment.
        segment: String,
    },
    /// The configured base URL could not be parsed.
    #[error("invalid base_url configuration")]
    InvalidBaseUrl(#[source] url::ParseError),
    /// The configured base URL cannot carry a path, e.g. `mailto:`.
    #[error("base_url cannot be used as a base for endpoint paths")]
    CannotBeABase,
    /// No response could be obtained: connection failure, timeout, TLS error.
    // reqwest::Error and serde_json::Error are not clonable, so we're wrapping them in an Arc.
    #[error(transparent)]
    Transport(Arc<reqwest::Error>),
    /// A non-2xx response whose body is not JSON.
    #[error("server responded with status {status} and a non-JSON body")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Raw body, lossily decoded as UTF-8.
        body: String,
    },
    /// A 2xx response whose body is not JSON.
    #[error("failed to decode response body as JSON")]
    Decode(#[source] Arc<serde_json::Error>),
    /// Body attributes could not be serialized.
    #[error("failed to encode request body")]
    Encode(#[source] Arc<serde_json::Error>),
    /// A token refresh was requested before any token was set.
    #[error("no token has been set, authenticate first")]
    MissingToken,
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(Arc::new(value))
    }
}
