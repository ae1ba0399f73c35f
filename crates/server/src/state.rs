use std::sync::Arc;

use eventdesk_store::{DocumentStore, MemoryStore, RemoteStore};
use tracing::info;

use crate::config::{Backend, Config, ConfigError};
use crate::error::AppError;

/// Shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Backend serving this tenant
    pub store: Arc<dyn DocumentStore>,
    admin_password: Arc<str>,
}

impl AppState {
    /// State over an explicit store.
    pub fn new(store: Arc<dyn DocumentStore>, admin_password: impl Into<Arc<str>>) -> Self {
        Self {
            store,
            admin_password: admin_password.into(),
        }
    }

    /// Build the configured backend.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let store: Arc<dyn DocumentStore> = match config.backend {
            Backend::Memory => Arc::new(MemoryStore::new(config.memory_tenant())),
            Backend::Firestore => Arc::new(RemoteStore::connect(config.remote_config()?)?),
        };
        info!(
            backend = store.kind(),
            tenant = store.tenant_id(),
            "Document store initialized"
        );
        Ok(Self::new(store, config.admin_password.as_str()))
    }

    /// True when `supplied` equals the configured admin password.
    pub fn is_admin(&self, supplied: Option<&str>) -> bool {
        supplied.is_some_and(|p| p == &*self.admin_password)
    }

    /// Run blocking store calls off the async executor.
    ///
    /// Store failures become [`AppError::Store`] tagged with `context`.
    pub async fn with_store<T, F>(&self, context: &'static str, f: F) -> Result<T, AppError>
    where
        F: FnOnce(&dyn DocumentStore) -> eventdesk_core::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(store.as_ref()))
            .await
            .map_err(|e| AppError::Internal(e.to_string()))?
            .map_err(|source| AppError::Store { context, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_check() {
        let state = AppState::new(Arc::new(MemoryStore::new("t")), "pw");
        assert!(state.is_admin(Some("pw")));
        assert!(!state.is_admin(Some("PW")));
        assert!(!state.is_admin(Some("")));
        assert!(!state.is_admin(None));
    }

    #[test]
    fn test_memory_backend_from_config() {
        let config = Config::from_lookup(|key| match key {
            "STORE_BACKEND" => Some("memory".to_string()),
            "CLIENT_ID" => Some("acme".to_string()),
            _ => None,
        })
        .unwrap();
        let state = AppState::from_config(&config).unwrap();
        assert_eq!(state.store.kind(), "memory");
        assert_eq!(state.store.tenant_id(), "acme");
    }

    #[tokio::test]
    async fn test_with_store_maps_errors() {
        let state = AppState::new(Arc::new(MemoryStore::new("t")), "pw");
        let result = state
            .with_store("Failed to write", |store| {
                store.collection("unknown").add(Default::default()).map(|_| ())
            })
            .await;
        match result {
            Err(AppError::Store { context, .. }) => assert_eq!(context, "Failed to write"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
