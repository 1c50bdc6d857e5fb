//! Storage error types.
//!
//! Every variant carries the key or store name it concerns so a failure can
//! be diagnosed from the log line alone.

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// No value is stored under the requested key.
    #[error("value not found for key '{key}'")]
    ValueNotFound { key: String },

    /// Failed to open or create a named store.
    #[error("failed to open store '{name}': {reason}")]
    Open { name: String, reason: String },

    /// Failed to connect to the storage backend.
    #[error("failed to connect to storage backend: {reason}")]
    Connect { reason: String },

    /// Failed to read a value from storage.
    #[error("failed to read key '{key}': {reason}")]
    Read { key: String, reason: String },

    /// Failed to write a value to storage.
    #[error("failed to write key '{key}': {reason}")]
    Write { key: String, reason: String },

    /// The store name cannot be used by this backend.
    #[error("invalid store name: {reason}")]
    InvalidName { reason: String },
}

impl StorageError {
    /// Whether this is the provider's "value not found" signal.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ValueNotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_value_not_found_is_not_found() {
        let missing = StorageError::ValueNotFound {
            key: "doc".to_owned(),
        };
        let broken = StorageError::Read {
            key: "doc".to_owned(),
            reason: "disk on fire".to_owned(),
        };
        assert!(missing.is_not_found());
        assert!(!broken.is_not_found());
    }

    #[test]
    fn display_includes_context() {
        let err = StorageError::Open {
            name: "vault-1".to_owned(),
            reason: "permission denied".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to open store 'vault-1': permission denied"
        );
    }
}
