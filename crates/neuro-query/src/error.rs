//! Error types for the neuro-query client.
//!
//! Uses `thiserror` for structured error handling with automatic `From` implementations.
//! Every variant displays as the bare message that follows the component prefixes
//! ("Failed to fetch terms: ", "Unable to fetch studies: ").

/// Errors from the HTTP client layer.
#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// HTTP transport error (connection, DNS, TLS, timeout, etc.)
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status
    #[error("{message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Server-supplied message, or `HTTP <status>`
        message: String,
    },

    /// Response body was not the JSON we need
    #[error("{0}")]
    Parse(#[from] serde_json::Error),

    /// Request URL could not be assembled from the base URL
    #[error("cannot build request URL from '{0}'")]
    InvalidUrl(String),

    /// Query has no path-segment form (`.` or `..`)
    #[error("query '{0}' cannot be sent as a URL path segment")]
    UnaddressableQuery(String),

    /// No Tokio runtime to run the request on
    #[error("no async runtime is available to run the request")]
    NoRuntime,
}

impl ClientError {
    /// Create a status error, preferring the server message when present.
    #[must_use]
    pub fn status(status: u16, server_message: Option<&str>) -> Self {
        let message = server_message
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map_or_else(|| format!("HTTP {status}"), str::to_string);
        Self::Status { status, message }
    }

    /// HTTP status code, if this error carries one.
    #[must_use]
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for client operations.
pub type ClientResult<T> = Result<T, ClientError>;
