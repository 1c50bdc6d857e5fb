//! Storage provider abstraction for the EDV server.
//!
//! A [`StorageProvider`] opens named [`Store`]s. Each store is an independent,
//! durable key-value namespace: string keys, opaque byte values. The vault
//! collection in `edv-core` opens one store per vault and never looks inside
//! the values it writes.
//!
//! Three providers are available:
//!
//! - [`MemoryProvider`] — in-memory, nothing survives a restart
//! - [`RocksDbProvider`] — one column family per store (feature `rocksdb-backend`)
//! - [`PostgresProvider`] — two tables keyed by store name (feature `postgres-backend`)

use std::sync::Arc;

mod error;
mod memory;
#[cfg(feature = "postgres-backend")]
mod postgres_backend;
#[cfg(feature = "rocksdb-backend")]
mod rocksdb_backend;

pub use error::StorageError;
pub use memory::{MemoryProvider, MemoryStore};
#[cfg(feature = "postgres-backend")]
pub use postgres_backend::{PostgresProvider, PostgresStore};
#[cfg(feature = "rocksdb-backend")]
pub use rocksdb_backend::{RocksDbProvider, RocksDbStore};

/// A single named key-value store.
///
/// Implementations must be safe to share across async tasks (`Send + Sync`).
/// Single-key `get` and `put` are atomic with respect to each other; nothing
/// stronger is promised.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// Retrieve the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ValueNotFound`] if the key does not exist, or
    /// [`StorageError::Read`] if the underlying backend fails.
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError>;

    /// Store a value under `key`, overwriting any existing value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Write`] if the underlying backend fails.
    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;
}

/// Opens named stores on a storage backend.
#[async_trait::async_trait]
pub trait StorageProvider: Send + Sync + 'static {
    /// Open the store called `name`, creating it if it does not exist.
    ///
    /// Opening the same name twice yields two handles onto the same data.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::InvalidName`] for an empty name and
    /// [`StorageError::Open`] if the backend cannot create the store.
    async fn open_store(&self, name: &str) -> Result<Arc<dyn Store>, StorageError>;

    /// Names of every store that has been created on this backend.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Read`] if the backend cannot enumerate stores.
    async fn store_names(&self) -> Result<Vec<String>, StorageError>;
}

/// Reject names no backend can represent.
pub(crate) fn validate_store_name(name: &str) -> Result<(), StorageError> {
    if name.is_empty() {
        return Err(StorageError::InvalidName {
            reason: "store name cannot be empty".to_owned(),
        });
    }
    Ok(())
}
