//! Server configuration for the EDV server.
//!
//! Every setting can be given as a command-line flag or through its `EDV_*`
//! environment variable; a flag wins over the environment. Parsing only
//! collects values; [`ServerConfig::host_url`] and
//! [`ServerConfig::storage_backend`] check that the required ones are present
//! and consistent.

use clap::Parser;

/// Errors from validating the server configuration.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// No host URL was given.
    #[error("host URL not provided")]
    MissingHostUrl,

    /// The database type is missing or not one of the supported options.
    #[error("database type not set to a valid type. run start --help to see the available options")]
    InvalidDatabaseType,

    /// A persistent database type was chosen without a database URL.
    #[error("database URL not set")]
    MissingDatabaseUrl,
}

/// Command-line and environment configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "edv-server", version, about = "Start the EDV REST server")]
pub struct ServerConfig {
    /// URL to run the EDV instance on. Format: HostName:Port.
    #[arg(short = 'u', long, env = "EDV_HOST_URL")]
    pub host_url: Option<String>,

    /// The type of database to use internally in the EDV. Supported options: mem, rocksdb, postgres.
    #[arg(short = 't', long, env = "EDV_DATABASE_TYPE")]
    pub database_type: Option<String>,

    /// The URL of the database. Not needed if using mem. For rocksdb this is a
    /// directory path; for postgres a connection string.
    #[arg(short = 'l', long, env = "EDV_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Log filter (e.g. `info`, `debug`, `edv_core=trace`). `RUST_LOG` takes precedence.
    #[arg(long, env = "EDV_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Maximum accepted request body size in bytes.
    #[arg(long, env = "EDV_BODY_LIMIT", default_value_t = DEFAULT_BODY_LIMIT)]
    pub body_limit: usize,

    /// Do not re-register vaults already present in the database at startup.
    #[arg(long, env = "EDV_NO_RESTORE")]
    pub no_restore: bool,
}

/// Default request body limit: 1 MiB.
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

/// Supported storage backend types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackendType {
    /// In-memory (data lost on restart).
    Memory,
    /// `RocksDB` database in the given directory.
    RocksDb { path: String },
    /// PostgreSQL reachable at the given connection string.
    Postgres { url: String },
}

impl ServerConfig {
    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingHostUrl`] if no non-empty host URL was given.
    pub fn host_url(&self) -> Result<&str, ConfigError> {
        match self.host_url.as_deref() {
            Some(url) if !url.is_empty() => Ok(url),
            _ => Err(ConfigError::MissingHostUrl),
        }
    }

    /// Resolve the storage backend from the database type and URL.
    ///
    /// The database type is matched case-insensitively.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidDatabaseType`] for a missing or unknown type.
    /// - [`ConfigError::MissingDatabaseUrl`] if `rocksdb` or `postgres` is
    ///   chosen without a database URL.
    pub fn storage_backend(&self) -> Result<StorageBackendType, ConfigError> {
        let database_type = self
            .database_type
            .as_deref()
            .ok_or(ConfigError::InvalidDatabaseType)?
            .to_lowercase();

        let database_url = || {
            self.database_url
                .clone()
                .filter(|url| !url.is_empty())
                .ok_or(ConfigError::MissingDatabaseUrl)
        };

        match database_type.as_str() {
            "mem" => Ok(StorageBackendType::Memory),
            "rocksdb" => Ok(StorageBackendType::RocksDb {
                path: database_url()?,
            }),
            "postgres" | "postgresql" => Ok(StorageBackendType::Postgres {
                url: database_url()?,
            }),
            _ => Err(ConfigError::InvalidDatabaseType),
        }
    }
}
