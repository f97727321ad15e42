//! Configuration for the neuro-query client.

use std::time::Duration;

use url::Url;

/// API configuration constants.
pub mod api {
    use std::time::Duration;

    /// Default base URL for the query backend.
    pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

    /// Environment variable holding the backend base URL.
    pub const BASE_URL_ENV: &str = "NEURO_QUERY_API_BASE";

    /// Request timeout.
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Connection timeout.
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Terms shown per catalog page.
    pub const TERMS_PAGE_SIZE: usize = 30;

    /// Studies shown per result page.
    pub const STUDIES_PAGE_SIZE: usize = 20;
}

/// Errors raised while building a [`Config`].
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The base URL did not parse.
    #[error("invalid API base URL '{input}': {source}")]
    InvalidUrl {
        /// Raw input
        input: String,
        /// Parse failure
        #[source]
        source: url::ParseError,
    },

    /// The base URL parsed but cannot carry request paths.
    #[error("API base URL must be http(s): '{0}'")]
    UnsupportedScheme(String),
}

/// Client configuration.
///
/// Built once at startup and handed to the client; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL every endpoint path is appended to.
    pub api_base: Url,

    /// Request timeout.
    pub request_timeout: Duration,

    /// Connection timeout.
    pub connect_timeout: Duration,
}

impl Config {
    /// Create a configuration for the given base URL.
    ///
    /// Trailing slashes are tolerated.
    pub fn new(api_base: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            api_base: parse_base(api_base)?,
            request_timeout: api::REQUEST_TIMEOUT,
            connect_timeout: api::CONNECT_TIMEOUT,
        })
    }

    /// Create a test configuration pointing at a mock server.
    ///
    /// # Panics
    ///
    /// Panics if `base_url` is not a valid http(s) URL.
    #[must_use]
    pub fn for_testing(base_url: &str) -> Self {
        Self {
            api_base: parse_base(base_url).expect("mock server URL is valid"),
            request_timeout: Duration::from_secs(5),
            connect_timeout: Duration::from_secs(2),
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Falls back to [`api::DEFAULT_BASE_URL`] when the variable is unset.
    pub fn from_env() -> anyhow::Result<Self> {
        let base =
            std::env::var(api::BASE_URL_ENV).unwrap_or_else(|_| api::DEFAULT_BASE_URL.to_string());
        Ok(Self::new(&base)?)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(api::DEFAULT_BASE_URL).expect("default base URL is valid")
    }
}

fn parse_base(input: &str) -> Result<Url, ConfigError> {
    let trimmed = input.trim().trim_end_matches('/');
    let url = Url::parse(trimmed)
        .map_err(|source| ConfigError::InvalidUrl { input: input.to_string(), source })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::UnsupportedScheme(input.to_string()));
    }

    Ok(url)
}
