//! `RocksDB` storage provider — the durable default.
//!
//! One database directory holds every store. Each store is a column family
//! named `store:<name>`, so store names never collide with `RocksDB`'s own
//! `default` family. Column families found on disk are reopened when the
//! provider starts, which is what lets [`StorageProvider::store_names`] report
//! stores created by earlier processes.
//!
//! All `RocksDB` calls are synchronous, so they run on the Tokio blocking pool
//! via [`tokio::task::spawn_blocking`].

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rocksdb::{DBWithThreadMode, MultiThreaded, Options};
use tokio::sync::Mutex;
use tracing::debug;

use crate::{StorageError, StorageProvider, Store, validate_store_name};

type Db = DBWithThreadMode<MultiThreaded>;

const STORE_CF_PREFIX: &str = "store:";

fn cf_name(store: &str) -> String {
    format!("{STORE_CF_PREFIX}{store}")
}

/// A storage provider backed by a single `RocksDB` database.
///
/// # Examples
///
/// ```no_run
/// # use edv_storage::RocksDbProvider;
/// let provider = RocksDbProvider::open("/var/lib/edv/data").unwrap();
/// ```
#[derive(Clone)]
pub struct RocksDbProvider {
    db: Arc<Db>,
    path: PathBuf,
    stores: Arc<Mutex<BTreeSet<String>>>,
}

impl std::fmt::Debug for RocksDbProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDbProvider")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RocksDbProvider {
    /// Open (or create) the database at `path`, reopening every store found
    /// in it.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if an existing database cannot be read
    /// or `RocksDB` fails to open it.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let open_error = |e: rocksdb::Error| StorageError::Open {
            name: path.display().to_string(),
            reason: e.to_string(),
        };

        // Only a directory without a database yet has no column families.
        let existing = if path.join("CURRENT").exists() {
            Db::list_cf(&opts, path).map_err(open_error)?
        } else {
            Vec::new()
        };

        let db = Db::open_cf(&opts, path, &existing).map_err(open_error)?;

        let stores: BTreeSet<String> = existing
            .iter()
            .filter_map(|cf| cf.strip_prefix(STORE_CF_PREFIX))
            .map(str::to_owned)
            .collect();

        debug!(path = %path.display(), stores = stores.len(), "opened RocksDB database");

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
            stores: Arc::new(Mutex::new(stores)),
        })
    }
}

#[async_trait::async_trait]
impl StorageProvider for RocksDbProvider {
    async fn open_store(&self, name: &str) -> Result<Arc<dyn Store>, StorageError> {
        validate_store_name(name)?;

        let mut stores = self.stores.lock().await;
        if !stores.contains(name) {
            let db = Arc::clone(&self.db);
            let cf = cf_name(name);
            let store = name.to_owned();
            tokio::task::spawn_blocking(move || {
                db.create_cf(&cf, &Options::default())
                    .map_err(|e| StorageError::Open {
                        name: store,
                        reason: e.to_string(),
                    })
            })
            .await
            .map_err(|e| StorageError::Open {
                name: name.to_owned(),
                reason: format!("blocking task panicked: {e}"),
            })??;
            stores.insert(name.to_owned());
        }

        Ok(Arc::new(RocksDbStore {
            db: Arc::clone(&self.db),
            name: name.to_owned(),
            cf: cf_name(name),
        }))
    }

    async fn store_names(&self) -> Result<Vec<String>, StorageError> {
        let stores = self.stores.lock().await;
        Ok(stores.iter().cloned().collect())
    }
}

/// A handle onto one column family of a [`RocksDbProvider`] database.
#[derive(Clone)]
pub struct RocksDbStore {
    db: Arc<Db>,
    name: String,
    cf: String,
}

impl std::fmt::Debug for RocksDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDbStore")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Store for RocksDbStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let db = Arc::clone(&self.db);
        let cf = self.cf.clone();
        let key = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let Some(handle) = db.cf_handle(&cf) else {
                return Err(StorageError::Read {
                    key,
                    reason: format!("column family '{cf}' is missing"),
                });
            };
            let value = db.get_cf(&handle, key.as_bytes());
            match value {
                Ok(Some(bytes)) => Ok(bytes),
                Ok(None) => Err(StorageError::ValueNotFound { key }),
                Err(e) => Err(StorageError::Read {
                    key,
                    reason: e.to_string(),
                }),
            }
        })
        .await
        .map_err(|e| StorageError::Read {
            key: String::new(),
            reason: format!("blocking task panicked: {e}"),
        })?
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        let cf = self.cf.clone();
        let key = key.to_owned();
        let value = value.to_vec();
        tokio::task::spawn_blocking(move || {
            let Some(handle) = db.cf_handle(&cf) else {
                return Err(StorageError::Write {
                    key,
                    reason: format!("column family '{cf}' is missing"),
                });
            };
            let written = db.put_cf(&handle, key.as_bytes(), &value);
            written.map_err(|e| StorageError::Write {
                key,
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| StorageError::Write {
            key: String::new(),
            reason: format!("blocking task panicked: {e}"),
        })?
    }
}
