//! Datahub REST client.
//!
//! Every catalog operation is one outbound GET; responses come back as opaque
//! JSON because the upstream schema is not modeled here.

use crate::config::{CatalogAuth, CatalogConfig};
use crate::redact::{redact_url, sanitize_reqwest_error};
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;
use url::Url;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// Invalid base URL or credentials at construction.
    #[error("config error: {0}")]
    Config(String),

    /// Unknown tool name; rejected before any request is issued.
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// Missing or malformed tool arguments (including a malformed URN).
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Upstream returned a non-success status.
    #[error("api error: {0}")]
    Http(String),

    /// The HTTP call itself failed (connect, timeout, decode).
    #[error("http transport error: {0}")]
    Transport(String),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

impl From<reqwest::Error> for CatalogError {
    fn from(value: reqwest::Error) -> Self {
        Self::Transport(sanitize_reqwest_error(&value))
    }
}

/// Prefix every dataset URN must carry.
pub const DATASET_URN_PREFIX: &str = "urn:li:dataset:";

const DATASET_ENTITY_PATH: &str = "/v3/entity/dataset";

/// Client for the Datahub dataset catalog.
///
/// Stateless after construction and cheap to clone; concurrent calls need no
/// synchronization.
#[derive(Clone)]
pub struct DatasetCatalog {
    inner: Arc<DatasetCatalogInner>,
}

struct DatasetCatalogInner {
    config: CatalogConfig,
    client: Client,
}

impl DatasetCatalog {
    /// Build a catalog client from a static config.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Config` if the base URL does not parse as an
    /// http(s) URL or the HTTP client cannot be built.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let url = Url::parse(&config.base_url).map_err(|e| {
            CatalogError::Config(format!("Invalid base URL '{}': {e}", config.base_url))
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(CatalogError::Config(format!(
                "Invalid base URL '{}': unsupported scheme '{}'",
                config.base_url,
                url.scheme()
            )));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| CatalogError::Config(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner: Arc::new(DatasetCatalogInner { config, client }),
        })
    }

    /// List datasets, sorted by URN.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request fails (transport or non-2xx
    /// response).
    pub async fn list_datasets(&self, count: u32) -> Result<Value> {
        let count = count.to_string();
        let query: &[(&str, &str)] = &[
            ("systemMetadata", "false"),
            ("includeSoftDelete", "false"),
            ("skipCache", "false"),
            ("aspects", "datasetKey"),
            ("count", count.as_str()),
            ("sortCriteria", "urn"),
            ("sortOrder", "ASCENDING"),
        ];
        self.get(DATASET_ENTITY_PATH, query).await
    }

    /// Fetch one dataset by URN.
    ///
    /// # Errors
    ///
    /// A malformed URN is rejected with `InvalidArguments` before any request
    /// is issued; otherwise errors as [`Self::list_datasets`].
    pub async fn dataset_by_urn(&self, urn: &str) -> Result<Value> {
        validate_dataset_urn(urn)?;
        let path = format!("{DATASET_ENTITY_PATH}/{}", percent_encode(urn));
        self.get(&path, &[]).await
    }

    /// One cheap authenticated request, used to verify credentials at startup.
    ///
    /// # Errors
    ///
    /// Errors as [`Self::list_datasets`].
    pub async fn probe(&self) -> Result<()> {
        self.list_datasets(1).await.map(|_| ())
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Value> {
        let url = build_url(&self.inner.config.base_url, path, query)?;
        debug!(url = %redact_url(&url), "datahub request");

        let request = apply_auth(&self.inner.config.auth, self.inner.client.get(url));
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        let body = bytes_to_json(&bytes);
        if status.is_success() {
            return Ok(body);
        }

        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown");
        Err(CatalogError::Http(format!(
            "API returned {status_code} {reason}: {body}"
        )))
    }
}

/// Validate the shape of a dataset URN before issuing a request.
///
/// Datahub URNs are otherwise opaque; only the `urn:li:dataset:` prefix is
/// checked so obviously wrong identifiers fail without a network round-trip.
///
/// # Errors
///
/// Returns `CatalogError::InvalidArguments` for an empty or mis-prefixed URN.
pub fn validate_dataset_urn(urn: &str) -> Result<()> {
    if urn.trim().is_empty() {
        return Err(CatalogError::InvalidArguments(
            "dataset urn must not be empty".to_string(),
        ));
    }
    if !urn.starts_with(DATASET_URN_PREFIX) {
        return Err(CatalogError::InvalidArguments(format!(
            "dataset urn must start with '{DATASET_URN_PREFIX}', got '{urn}'"
        )));
    }
    Ok(())
}

fn apply_auth(auth: &CatalogAuth, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match auth {
        CatalogAuth::Basic { username, password } => request.basic_auth(username, Some(password)),
        CatalogAuth::Bearer { token } => request.bearer_auth(token),
    }
}

fn build_url(base_url: &str, path: &str, query: &[(&str, &str)]) -> Result<Url> {
    let url = format!("{}{}", base_url.trim_end_matches('/'), path);
    let mut url =
        Url::parse(&url).map_err(|e| CatalogError::Config(format!("Invalid request URL: {e}")))?;

    if !query.is_empty() {
        let mut q = String::new();
        for (i, (k, v)) in query.iter().enumerate() {
            if i > 0 {
                q.push('&');
            }
            q.push_str(&percent_encode(k));
            q.push('=');
            q.push_str(&percent_encode(v));
        }
        url.set_query(Some(&q));
    }

    Ok(url)
}

fn bytes_to_json(bytes: &[u8]) -> Value {
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

/// Strict percent-encoding: everything outside the RFC 3986 unreserved set is
/// escaped, which is valid in both path segments and query components. URNs
/// carry `(`, `,` and `:`, so this is load-bearing for `dataset_by_urn`.
fn percent_encode(s: &str) -> String {
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = String::with_capacity(s.len());
    for &b in s.as_bytes() {
        if is_unreserved(b) {
            out.push(b as char);
        } else {
            out.push('%');
            out.push(HEX[(b >> 4) as usize] as char);
            out.push(HEX[(b & 0x0F) as usize] as char);
        }
    }
    out
}

fn is_unreserved(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~')
}
