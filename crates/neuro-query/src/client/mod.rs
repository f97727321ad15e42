//! Query backend client.
//!
//! Provides the [`StudyBackend`] seam the components fetch through, and its
//! HTTP implementation:
//! - Connection pooling via reqwest
//! - `GET {base}/terms` for the vocabulary
//! - `GET {base}/query/{query}/studies` for matching studies, the query sent
//!   as one percent-encoded path segment

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{ClientError, ClientResult};
use crate::models::{Study, StudyList, Term, TermList};

/// Escapes everything `encodeURIComponent` escapes, including `+`, `&` and `=`.
const QUERY_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Source of terms and studies.
///
/// Components hold an `Arc<dyn StudyBackend>` so tests can script responses.
#[async_trait::async_trait]
pub trait StudyBackend: Send + Sync {
    /// Fetch the full term vocabulary.
    async fn fetch_terms(&self) -> ClientResult<Vec<Term>>;

    /// Fetch studies matching `query`.
    async fn fetch_studies(&self, query: &str) -> ClientResult<Vec<Study>>;
}

/// HTTP client for the query backend.
#[derive(Clone)]
pub struct NeuroQueryClient {
    /// HTTP client.
    client: reqwest::Client,

    /// Base URL every endpoint is appended to.
    api_base: Url,
}

impl NeuroQueryClient {
    /// Create a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails.
    pub fn new(config: Config) -> anyhow::Result<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .gzip(true)
            .build()?;

        Ok(Self { client, api_base: config.api_base })
    }

    /// Base URL this client talks to.
    #[must_use]
    pub const fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// URL of the vocabulary endpoint.
    pub fn terms_url(&self) -> ClientResult<Url> {
        self.endpoint(&["terms"])
    }

    /// URL of the study endpoint for `query`.
    ///
    /// A query of `.` or `..` has no URL form: path normalization folds the
    /// segment away, escaped or not, which would address another endpoint.
    pub fn studies_url(&self, query: &str) -> ClientResult<Url> {
        if matches!(query, "." | "..") {
            return Err(ClientError::UnaddressableQuery(query.to_string()));
        }
        let segment = utf8_percent_encode(query, QUERY_SEGMENT).to_string();
        self.endpoint(&["query", &segment, "studies"])
    }

    /// Append already-encoded segments to the base path.
    fn endpoint(&self, encoded: &[&str]) -> ClientResult<Url> {
        if self.api_base.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(self.api_base.to_string()));
        }
        let mut url = self.api_base.clone();
        let path = format!("{}/{}", url.path().trim_end_matches('/'), encoded.join("/"));
        url.set_path(&path);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl StudyBackend for NeuroQueryClient {
    async fn fetch_terms(&self) -> ClientResult<Vec<Term>> {
        let url = self.terms_url()?;
        tracing::debug!(%url, "Fetching terms");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::status(status.as_u16(), None));
        }

        let body = response.bytes().await?;
        let value: Value = serde_json::from_slice(&body)?;
        let list = TermList::from_value(&value);

        tracing::debug!(count = list.terms.len(), "Fetched terms");
        Ok(list.terms)
    }

    async fn fetch_studies(&self, query: &str) -> ClientResult<Vec<Study>> {
        let url = self.studies_url(query)?;
        tracing::debug!(%url, query, "Fetching studies");

        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        // Unparseable bodies decode as `{}`; only the status decides failure.
        let value: Value =
            serde_json::from_slice(&body).unwrap_or_else(|_| Value::Object(serde_json::Map::new()));

        if !status.is_success() {
            let message = value.get("error").and_then(Value::as_str);
            return Err(ClientError::status(status.as_u16(), message));
        }

        let list = StudyList::from_value(value);
        tracing::debug!(query, count = list.results.len(), "Fetched studies");
        Ok(list.results)
    }
}

impl std::fmt::Debug for NeuroQueryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeuroQueryClient").field("api_base", &self.api_base.as_str()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> NeuroQueryClient {
        NeuroQueryClient::new(Config::new(base).unwrap()).unwrap()
    }

    #[test]
    fn test_terms_url() {
        let client = client("http://localhost:8000/api/");
        assert_eq!(client.terms_url().unwrap().as_str(), "http://localhost:8000/api/terms");
    }

    #[test]
    fn test_studies_url_encodes_query_as_one_segment() {
        let client = client("http://localhost:8000/api");
        let url = client.studies_url("stroke fMRI/lang?#").unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/query/stroke%20fMRI%2Flang%3F%23/studies"
        );
    }

    #[test]
    fn test_studies_url_escapes_like_uri_components() {
        let client = client("http://localhost:8000/api");
        let url = client.studies_url("a+b&c=d 50%").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/query/a%2Bb%26c%3Dd%2050%25/studies");

        let url = client.studies_url("(fMRI)*!~'-_.").unwrap();
        assert_eq!(url.path(), "/api/query/(fMRI)*!~'-_./studies");
    }

    #[test]
    fn test_dot_queries_are_not_sent_to_another_endpoint() {
        let client = client("http://localhost:8000/api");
        for query in [".", ".."] {
            let err = client.studies_url(query).unwrap_err();
            assert!(matches!(err, ClientError::UnaddressableQuery(ref q) if q == query));
        }
        let url = client.studies_url("...").unwrap();
        assert_eq!(url.path(), "/api/query/.../studies");
    }

    #[test]
    fn test_root_base_url() {
        let client = client("http://localhost:8000");
        assert_eq!(client.terms_url().unwrap().as_str(), "http://localhost:8000/terms");
    }
}
