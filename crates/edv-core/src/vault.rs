//! The vault collection: a registry of open vault stores.
//!
//! Each vault is one named store on the [`StorageProvider`]. The collection
//! remembers which stores it has opened, keyed by the vault's reference ID,
//! and enforces two invariants on top of the provider's plain get/put:
//!
//! - a reference ID is registered at most once (`DuplicateVault` otherwise);
//! - within a vault, a document ID is written at most once through
//!   [`VaultCollection::create_document`] (`DuplicateDocument` otherwise).
//!
//! # Concurrency
//!
//! The registry sits behind a `RwLock`. Vault creation checks for the ID under
//! the read lock, opens the store with no lock held, then re-checks and
//! inserts under the write lock. Opening a store is idempotent on every
//! provider, so two concurrent creations of one ID both open the same store
//! and exactly one of them wins the insert.
//!
//! Document creation is a read followed by a write on the store. Each vault
//! carries a write gate (a `Mutex`) held across that pair, so concurrent
//! creations of the same document ID in one vault produce exactly one
//! success. The gate only orders creations inside a single vault; reads never
//! take it. Writers that bypass the collection and reach the store directly
//! are not ordered by it.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;

use edv_storage::{StorageProvider, Store};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info};

use crate::document::StructuredDocument;
use crate::error::VaultError;

/// A registry entry: the open store plus its document-creation gate.
struct VaultHandle {
    store: Arc<dyn Store>,
    write_gate: Mutex<()>,
}

impl VaultHandle {
    fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
        }
    }
}

/// Registry of open vault stores, shared by every request handler.
pub struct VaultCollection {
    provider: Arc<dyn StorageProvider>,
    open_stores: RwLock<HashMap<String, Arc<VaultHandle>>>,
}

impl VaultCollection {
    /// Create an empty collection over the given provider.
    ///
    /// Vaults that already exist on the provider are not reachable until
    /// [`restore`](Self::restore) is called.
    #[must_use]
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            provider,
            open_stores: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new vault under `reference_id`.
    ///
    /// The caller is responsible for rejecting blank IDs.
    ///
    /// # Errors
    ///
    /// - [`VaultError::DuplicateVault`] if the ID is already registered.
    /// - [`VaultError::Storage`] if the provider cannot open the store.
    pub async fn create_vault(&self, reference_id: &str) -> Result<(), VaultError> {
        if self.open_stores.read().await.contains_key(reference_id) {
            return Err(VaultError::DuplicateVault);
        }

        let store = self.provider.open_store(reference_id).await?;

        let mut open_stores = self.open_stores.write().await;
        if open_stores.contains_key(reference_id) {
            return Err(VaultError::DuplicateVault);
        }
        open_stores.insert(reference_id.to_owned(), Arc::new(VaultHandle::new(store)));

        info!(vault_id = %reference_id, "data vault created");

        Ok(())
    }

    /// Store `document` in the vault `vault_id`, refusing to overwrite.
    ///
    /// # Errors
    ///
    /// - [`VaultError::VaultNotFound`] if the vault is not registered.
    /// - [`VaultError::DuplicateDocument`] if the vault already holds the ID.
    /// - [`VaultError::Serialization`] if the document cannot be encoded.
    /// - [`VaultError::Storage`] if the provider read or write fails.
    pub async fn create_document(
        &self,
        vault_id: &str,
        document: &StructuredDocument,
    ) -> Result<(), VaultError> {
        let vault = self.vault(vault_id).await?;
        let _gate = vault.write_gate.lock().await;

        match vault.store.get(&document.id).await {
            Ok(_) => return Err(VaultError::DuplicateDocument),
            Err(e) if e.is_not_found() => {}
            Err(e) => return Err(e.into()),
        }

        let document_json = serde_json::to_vec(document)?;
        vault.store.put(&document.id, &document_json).await?;

        debug!(vault_id = %vault_id, doc_id = %document.id, "document created");

        Ok(())
    }

    /// Return the bytes stored for `doc_id` in the vault `vault_id`.
    ///
    /// # Errors
    ///
    /// - [`VaultError::VaultNotFound`] if the vault is not registered.
    /// - [`VaultError::DocumentNotFound`] if the vault holds no such document.
    /// - [`VaultError::Storage`] for any other provider failure.
    pub async fn read_document(&self, vault_id: &str, doc_id: &str) -> Result<Vec<u8>, VaultError> {
        let vault = self.vault(vault_id).await?;

        match vault.store.get(doc_id).await {
            Ok(document_json) => Ok(document_json),
            Err(e) if e.is_not_found() => Err(VaultError::DocumentNotFound),
            Err(e) => Err(e.into()),
        }
    }

    /// Register every store the provider already holds.
    ///
    /// Stores that are already registered are left alone. Returns the number
    /// of vaults newly registered.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Storage`] if the provider cannot list or open
    /// its stores. Nothing is registered when that happens.
    pub async fn restore(&self) -> Result<usize, VaultError> {
        let names = self.provider.store_names().await?;
        let pending: Vec<String> = {
            let open_stores = self.open_stores.read().await;
            names
                .into_iter()
                .filter(|name| !open_stores.contains_key(name))
                .collect()
        };

        let mut opened = Vec::with_capacity(pending.len());
        for name in pending {
            let store = self.provider.open_store(&name).await?;
            opened.push((name, store));
        }

        let mut open_stores = self.open_stores.write().await;
        let mut restored = 0usize;
        for (name, store) in opened {
            if let Entry::Vacant(slot) = open_stores.entry(name) {
                slot.insert(Arc::new(VaultHandle::new(store)));
                restored = restored.saturating_add(1);
            }
        }

        Ok(restored)
    }

    /// Number of registered vaults.
    pub async fn vault_count(&self) -> usize {
        self.open_stores.read().await.len()
    }

    #[cfg(test)]
    async fn contains(&self, vault_id: &str) -> bool {
        self.open_stores.read().await.contains_key(vault_id)
    }

    async fn vault(&self, vault_id: &str) -> Result<Arc<VaultHandle>, VaultError> {
        self.open_stores
            .read()
            .await
            .get(vault_id)
            .cloned()
            .ok_or(VaultError::VaultNotFound)
    }
}

impl std::fmt::Debug for VaultCollection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultCollection").finish_non_exhaustive()
    }
}
