//! Error types for `edv-core`.
//!
//! [`VaultError`] is a closed set. [`VaultError::kind`] classifies every
//! variant and the HTTP layer picks status codes from that [`ErrorKind`], so
//! adding a variant forces a decision about its status code. The display
//! strings of the four domain variants are part of the wire contract and
//! must not change.

use edv_storage::StorageError;

/// Returned when a vault ID is not registered.
pub const VAULT_NOT_FOUND_ERR_MSG: &str = "specified vault does not exist";
/// Returned when a document ID does not exist within the given vault.
pub const DOCUMENT_NOT_FOUND_ERR_MSG: &str = "specified document does not exist";
/// Returned when a vault is created with an ID that is already registered.
pub const DUPLICATE_VAULT_ERR_MSG: &str = "vault already exists";
/// Returned when a document is created with an ID already used in its vault.
pub const DUPLICATE_DOCUMENT_ERR_MSG: &str = "a document with the given id already exists";

/// Errors from vault collection operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// No vault is registered under the requested ID.
    #[error("{}", VAULT_NOT_FOUND_ERR_MSG)]
    VaultNotFound,

    /// The vault exists but holds no document with the requested ID.
    #[error("{}", DOCUMENT_NOT_FOUND_ERR_MSG)]
    DocumentNotFound,

    /// A vault with this reference ID is already registered.
    #[error("{}", DUPLICATE_VAULT_ERR_MSG)]
    DuplicateVault,

    /// The vault already holds a document with this ID.
    #[error("{}", DUPLICATE_DOCUMENT_ERR_MSG)]
    DuplicateDocument,

    /// The document could not be encoded for storage.
    #[error("{0}")]
    Serialization(#[from] serde_json::Error),

    /// Any provider failure other than "value not found".
    #[error("{0}")]
    Storage(#[from] StorageError),
}

/// Coarse classification of a [`VaultError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The vault or document does not exist.
    NotFound,
    /// The vault or document already exists.
    Conflict,
    /// A failure the vault collection did not recognise.
    Unclassified,
}

impl VaultError {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::VaultNotFound | Self::DocumentNotFound => ErrorKind::NotFound,
            Self::DuplicateVault | Self::DuplicateDocument => ErrorKind::Conflict,
            Self::Serialization(_) | Self::Storage(_) => ErrorKind::Unclassified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn domain_messages_are_exact() {
        assert_eq!(
            VaultError::VaultNotFound.to_string(),
            "specified vault does not exist"
        );
        assert_eq!(
            VaultError::DocumentNotFound.to_string(),
            "specified document does not exist"
        );
        assert_eq!(VaultError::DuplicateVault.to_string(), "vault already exists");
        assert_eq!(
            VaultError::DuplicateDocument.to_string(),
            "a document with the given id already exists"
        );
    }

    #[test]
    fn storage_errors_pass_through_unclassified() {
        let err = VaultError::from(StorageError::Write {
            key: "doc".to_owned(),
            reason: "disk full".to_owned(),
        });
        assert_eq!(err.kind(), ErrorKind::Unclassified);
        assert_eq!(err.to_string(), "failed to write key 'doc': disk full");
    }

    #[test]
    fn kinds() {
        assert_eq!(VaultError::VaultNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(VaultError::DocumentNotFound.kind(), ErrorKind::NotFound);
        assert_eq!(VaultError::DuplicateVault.kind(), ErrorKind::Conflict);
        assert_eq!(VaultError::DuplicateDocument.kind(), ErrorKind::Conflict);
    }
}
