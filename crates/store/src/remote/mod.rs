//! Hosted document store over the Firestore REST API
//!
//! Calls are blocking (`ureq`); async callers run them on a blocking pool.
//!
//! | Operation | Request |
//! |-----------|---------|
//! | list collection | `GET {root}/{collection}` following `nextPageToken` |
//! | filtered / limited view | `POST {root}/{parent}:runQuery` |
//! | add | `POST {root}/{collection}` |
//! | set | `PATCH {root}/{document}` |
//! | get | `GET {root}/{document}` (404 reads as absent) |
//! | delete | `DELETE {root}/{document}` |
//!
//! where `{root}` is `{base}/projects/{project}/databases/(default)/documents`.

pub mod auth;
mod client;
pub mod credentials;
mod handles;
pub mod query;
pub mod wire;

pub use auth::TokenSource;
pub use client::FIRESTORE_BASE_URL;
pub use credentials::{ServiceAccount, SigningKey};
pub use handles::{RemoteCollectionRef, RemoteDocumentIter, RemoteDocumentRef, RemoteSnapshot};
pub use query::RemoteQuery;

use std::sync::Arc;
use std::time::Duration;

use eventdesk_core::{Error, Result};
use tracing::info;

use crate::facade::{CollectionRef, DocumentStore};
use client::RestClient;

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bearer token the Firestore emulator treats as an admin
pub const EMULATOR_TOKEN: &str = "owner";

/// Connection settings for [`RemoteStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
    /// Google Cloud project id
    pub project_id: String,
    /// Tenant whose subtree the store serves
    pub tenant_id: String,
    /// API base, production or emulator
    pub base_url: String,
    /// Where bearer tokens come from
    pub token_source: TokenSource,
    /// Per-request timeout
    pub timeout: Duration,
}

impl RemoteConfig {
    /// Production endpoint, metadata-server tokens, default timeout.
    pub fn new(project_id: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            tenant_id: tenant_id.into(),
            base_url: FIRESTORE_BASE_URL.to_string(),
            token_source: TokenSource::Metadata,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Take project and tenant from a service-account key, and sign tokens
    /// with it when it carries a private key.
    pub fn from_service_account(account: &ServiceAccount) -> Self {
        let mut config = Self::new(account.project_id.clone(), account.client_id.clone());
        if let Some(key) = &account.key {
            config.token_source = TokenSource::ServiceAccount(key.clone());
        }
        config
    }

    /// Point at a local emulator (`host:port`), which accepts the `owner` token.
    pub fn with_emulator(mut self, host: &str) -> Self {
        self.base_url = format!("http://{}/v1", host.trim_end_matches('/'));
        self.token_source = TokenSource::Static(EMULATOR_TOKEN.to_string());
        self
    }

    /// Send `token` unchanged instead of fetching one.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.token_source = TokenSource::Static(token.into());
        self
    }

    /// Replace the token source.
    pub fn with_token_source(mut self, source: TokenSource) -> Self {
        self.token_source = source;
        self
    }

    /// Override the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Document store backed by a hosted Firestore database.
#[derive(Debug, Clone)]
pub struct RemoteStore {
    client: Arc<RestClient>,
    tenant_id: String,
}

impl RemoteStore {
    /// Build a store from `config`. No request is sent.
    pub fn connect(config: RemoteConfig) -> Result<Self> {
        if config.project_id.trim().is_empty() {
            return Err(Error::Credentials("project id is empty".to_string()));
        }
        if config.tenant_id.trim().is_empty() {
            return Err(Error::Credentials("tenant id is empty".to_string()));
        }
        let client = RestClient::new(
            &config.base_url,
            &config.project_id,
            config.token_source,
            config.timeout,
        );
        info!(
            project = %config.project_id,
            tenant = %config.tenant_id,
            root = client.documents_root(),
            "Firestore document store ready"
        );
        Ok(Self {
            client: Arc::new(client),
            tenant_id: config.tenant_id,
        })
    }
}

impl DocumentStore for RemoteStore {
    fn kind(&self) -> &'static str {
        "firestore"
    }

    fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    fn root(&self, name: &str) -> Box<dyn CollectionRef> {
        Box::new(RemoteCollectionRef::new(
            Arc::clone(&self.client),
            name.to_string(),
        ))
    }
}
