use std::path::PathBuf;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use volt_logging::volt_info;

use crate::KeySelectError;

/// External authority that lets the user pick a new API key.
///
/// Only invoked after a credential failure; completes once the user is done.
#[async_trait]
pub trait KeySelector: Send + Sync {
    async fn open_select_key(&self) -> Result<(), KeySelectError>;
}

/// API key shared between the HTTP backend and the key selector.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyStore {
    inner: Arc<RwLock<Option<String>>>,
}

impl ApiKeyStore {
    pub fn new(key: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(key)),
        }
    }

    pub fn get(&self) -> Option<String> {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set(&self, key: String) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Some(key);
    }
}

/// Reselects the key by re-reading a file the user edits out of band.
pub struct KeyFileSelector {
    path: PathBuf,
    store: ApiKeyStore,
}

impl KeyFileSelector {
    pub fn new(path: PathBuf, store: ApiKeyStore) -> Self {
        Self { path, store }
    }
}

#[async_trait]
impl KeySelector for KeyFileSelector {
    async fn open_select_key(&self) -> Result<(), KeySelectError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let key = content.trim();
        if key.is_empty() {
            return Err(KeySelectError::EmptyKey {
                path: self.path.clone(),
            });
        }
        self.store.set(key.to_string());
        volt_info!("API key reloaded from {:?}", self.path);
        Ok(())
    }
}
