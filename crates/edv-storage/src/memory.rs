//! In-memory storage provider.
//!
//! Every store is a `BTreeMap` behind a `RwLock`, and the provider keeps its
//! stores in a map of its own. Nothing is persisted — all data is lost when
//! the process exits. Selected with `--database-type mem` and used by the
//! unit and integration tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{StorageError, StorageProvider, Store, validate_store_name};

/// An in-memory store. Clones share the same data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    data: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let data = self.data.read().await;
        data.get(key)
            .cloned()
            .ok_or_else(|| StorageError::ValueNotFound {
                key: key.to_owned(),
            })
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let mut data = self.data.write().await;
        data.insert(key.to_owned(), value.to_vec());
        Ok(())
    }
}

/// An in-memory storage provider.
///
/// # Examples
///
/// ```
/// # use edv_storage::{MemoryProvider, StorageProvider};
/// # #[tokio::main]
/// # async fn main() {
/// let provider = MemoryProvider::new();
/// let store = provider.open_store("vault-1").await.unwrap();
/// store.put("doc-1", b"{}").await.unwrap();
/// assert_eq!(store.get("doc-1").await.unwrap(), b"{}".to_vec());
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    stores: Arc<RwLock<HashMap<String, MemoryStore>>>,
}

impl MemoryProvider {
    /// Create a provider with no stores.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl StorageProvider for MemoryProvider {
    async fn open_store(&self, name: &str) -> Result<Arc<dyn Store>, StorageError> {
        validate_store_name(name)?;

        let mut stores = self.stores.write().await;
        let store = stores
            .entry(name.to_owned())
            .or_default()
            .clone();
        Ok(Arc::new(store))
    }

    async fn store_names(&self) -> Result<Vec<String>, StorageError> {
        let stores = self.stores.read().await;
        let mut names: Vec<String> = stores.keys().cloned().collect();
        names.sort();
        Ok(names)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn get_nonexistent_is_value_not_found() {
        let provider = MemoryProvider::new();
        let store = provider.open_store("vault").await.unwrap();
        let err = store.get("does-not-exist").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn put_and_get_roundtrip() {
        let provider = MemoryProvider::new();
        let store = provider.open_store("vault").await.unwrap();
        store.put("doc", b"hello").await.unwrap();
        assert_eq!(store.get("doc").await.unwrap(), b"hello".to_vec());
    }

    #[tokio::test]
    async fn put_overwrites_existing() {
        let provider = MemoryProvider::new();
        let store = provider.open_store("vault").await.unwrap();
        store.put("doc", b"v1").await.unwrap();
        store.put("doc", b"v2").await.unwrap();
        assert_eq!(store.get("doc").await.unwrap(), b"v2".to_vec());
    }

    #[tokio::test]
    async fn stores_are_isolated() {
        let provider = MemoryProvider::new();
        let a = provider.open_store("a").await.unwrap();
        let b = provider.open_store("b").await.unwrap();
        a.put("doc", b"from a").await.unwrap();
        assert!(b.get("doc").await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn reopening_shares_data() {
        let provider = MemoryProvider::new();
        let first = provider.open_store("vault").await.unwrap();
        first.put("doc", b"val").await.unwrap();

        let second = provider.open_store("vault").await.unwrap();
        assert_eq!(second.get("doc").await.unwrap(), b"val".to_vec());
    }

    #[tokio::test]
    async fn empty_name_is_rejected() {
        let provider = MemoryProvider::new();
        let result = provider.open_store("").await;
        assert!(matches!(result, Err(StorageError::InvalidName { .. })));
    }

    #[tokio::test]
    async fn store_names_lists_opened_stores() {
        let provider = MemoryProvider::new();
        provider.open_store("beta").await.unwrap();
        provider.open_store("alpha").await.unwrap();
        provider.open_store("beta").await.unwrap();
        assert_eq!(provider.store_names().await.unwrap(), vec!["alpha", "beta"]);
    }

    #[tokio::test]
    async fn clone_shares_state() {
        let provider = MemoryProvider::new();
        let clone = provider.clone();
        provider.open_store("vault").await.unwrap();
        assert_eq!(clone.store_names().await.unwrap(), vec!["vault"]);
    }
}
