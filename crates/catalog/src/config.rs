//! Static configuration for the catalog client.

use std::time::Duration;

/// Authentication used for outbound Datahub requests.
#[derive(Debug, Clone)]
pub enum CatalogAuth {
    /// HTTP basic auth with the credential pair from the environment.
    Basic { username: String, password: String },
    /// Bearer auth with a previously issued Datahub access token.
    Bearer { token: String },
}

/// Immutable configuration for a [`DatasetCatalog`](crate::client::DatasetCatalog).
///
/// Built once at startup and passed to the client at construction; there is no
/// process-wide mutable credential state.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the Datahub instance, e.g. `http://localhost:8088`.
    pub base_url: String,
    pub auth: CatalogAuth,
    /// Timeout applied to every outbound request.
    pub timeout: Duration,
}

impl CatalogConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
}
