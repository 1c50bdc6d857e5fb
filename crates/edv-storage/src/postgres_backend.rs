//! PostgreSQL storage provider.
//!
//! Store names live in `edv_stores`; values live in `edv_documents`, keyed by
//! `(store, key)`. Both tables are created on connect if missing.
//!
//! Feature-gated behind `postgres-backend`. Uses `sqlx` with the Tokio
//! runtime, so no `spawn_blocking` is needed.

use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::{StorageError, StorageProvider, Store, validate_store_name};

/// A storage provider backed by PostgreSQL.
///
/// # Examples
///
/// ```no_run
/// # use edv_storage::PostgresProvider;
/// # #[tokio::main]
/// # async fn main() {
/// let provider = PostgresProvider::connect("postgres://localhost/edv").await.unwrap();
/// # }
/// ```
#[derive(Clone)]
pub struct PostgresProvider {
    pool: PgPool,
}

impl std::fmt::Debug for PostgresProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresProvider")
            .field("pool", &"[PgPool]")
            .finish_non_exhaustive()
    }
}

impl PostgresProvider {
    /// Connect to PostgreSQL and create the tables if needed.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Connect`] if the connection or migration fails.
    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Connect {
                reason: e.to_string(),
            })?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS edv_stores (\
                name TEXT PRIMARY KEY\
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| StorageError::Connect {
            reason: format!("migration failed: {e}"),
        })?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS edv_documents (\
                store TEXT  NOT NULL REFERENCES edv_stores (name), \
                key   TEXT  NOT NULL, \
                value BYTEA NOT NULL, \
                PRIMARY KEY (store, key)\
            )",
        )
        .execute(&pool)
        .await
        .map_err(|e| StorageError::Connect {
            reason: format!("migration failed: {e}"),
        })?;

        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl StorageProvider for PostgresProvider {
    async fn open_store(&self, name: &str) -> Result<Arc<dyn Store>, StorageError> {
        validate_store_name(name)?;

        sqlx::query("INSERT INTO edv_stores (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await
            .map_err(|e| StorageError::Open {
                name: name.to_owned(),
                reason: e.to_string(),
            })?;

        Ok(Arc::new(PostgresStore {
            pool: self.pool.clone(),
            name: name.to_owned(),
        }))
    }

    async fn store_names(&self) -> Result<Vec<String>, StorageError> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT name FROM edv_stores ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StorageError::Read {
                key: "edv_stores".to_owned(),
                reason: e.to_string(),
            })?;

        Ok(rows.into_iter().map(|(name,)| name).collect())
    }
}

/// A handle onto one store's rows in `edv_documents`.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
    name: String,
}

impl std::fmt::Debug for PostgresStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresStore")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Store for PostgresStore {
    async fn get(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        let row: Option<(Vec<u8>,)> =
            sqlx::query_as("SELECT value FROM edv_documents WHERE store = $1 AND key = $2")
                .bind(&self.name)
                .bind(key)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| StorageError::Read {
                    key: key.to_owned(),
                    reason: e.to_string(),
                })?;

        row.map(|(v,)| v).ok_or_else(|| StorageError::ValueNotFound {
            key: key.to_owned(),
        })
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        sqlx::query(
            "INSERT INTO edv_documents (store, key, value) VALUES ($1, $2, $3) \
             ON CONFLICT (store, key) DO UPDATE SET value = EXCLUDED.value",
        )
        .bind(&self.name)
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await
        .map_err(|e| StorageError::Write {
            key: key.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}
