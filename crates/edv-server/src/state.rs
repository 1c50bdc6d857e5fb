//! Shared application state for the EDV server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`.

use std::sync::Arc;

use edv_core::vault::VaultCollection;
use edv_storage::StorageProvider;

/// Shared application state passed to all HTTP handlers.
#[derive(Debug)]
pub struct AppState {
    /// Registry of open vaults.
    pub vaults: VaultCollection,
}

impl AppState {
    /// Build state around a fresh vault collection over `provider`.
    #[must_use]
    pub fn new(provider: Arc<dyn StorageProvider>) -> Self {
        Self {
            vaults: VaultCollection::new(provider),
        }
    }
}
