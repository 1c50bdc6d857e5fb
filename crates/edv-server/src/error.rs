//! HTTP error types for the EDV server.
//!
//! Maps [`VaultError`]s from `edv-core` into HTTP responses. Bodies are plain
//! text: EDV clients compare the message strings, so the domain messages are
//! passed through untouched. Each endpoint has its own mapping because the
//! same error maps to different statuses depending on the operation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use edv_core::error::{ErrorKind, VaultError};

/// Application-level error returned from HTTP handlers.
#[derive(Debug, PartialEq, Eq)]
pub enum AppError {
    /// Client sent invalid input, or an unclassified failure on a document path.
    BadRequest(String),
    /// The vault or document does not exist.
    NotFound(String),
    /// The vault already exists.
    Conflict(String),
    /// The request could not be routed correctly (e.g. undecodable path variables).
    Internal(String),
}

impl AppError {
    /// Map a failure from `POST /data-vaults`.
    #[must_use]
    pub fn vault_creation(err: &VaultError) -> Self {
        let message = format!("Data vault creation failed: {err}");
        match err.kind() {
            ErrorKind::Conflict => Self::Conflict(message),
            ErrorKind::NotFound | ErrorKind::Unclassified => Self::BadRequest(message),
        }
    }

    /// Map a failure from `POST /encrypted-data-vaults/{vaultID}/docs`.
    ///
    /// Every document creation failure is reported as a bad request.
    #[must_use]
    pub fn document_creation(err: &VaultError) -> Self {
        Self::BadRequest(err.to_string())
    }

    /// Map a failure from `GET /encrypted-data-vaults/{vaultID}/docs/{docID}`.
    #[must_use]
    pub fn document_read(err: &VaultError) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(err.to_string()),
            ErrorKind::Conflict | ErrorKind::Unclassified => Self::BadRequest(err.to_string()),
        }
    }

    /// The status code this error is sent with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (Self::BadRequest(message)
        | Self::NotFound(message)
        | Self::Conflict(message)
        | Self::Internal(message)) = self;

        if status.is_server_error() {
            error!(status = status.as_u16(), error = %message, "request failed");
        } else {
            warn!(status = status.as_u16(), error = %message, "request rejected");
        }

        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use edv_storage::StorageError;

    fn storage_failure() -> VaultError {
        VaultError::Storage(StorageError::Read {
            key: "d1".to_owned(),
            reason: "timeout".to_owned(),
        })
    }

    #[test]
    fn vault_creation_mapping() {
        assert_eq!(
            AppError::vault_creation(&VaultError::DuplicateVault),
            AppError::Conflict("Data vault creation failed: vault already exists".to_owned())
        );
        assert_eq!(
            AppError::vault_creation(&storage_failure()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn document_creation_is_always_bad_request() {
        for err in [
            VaultError::VaultNotFound,
            VaultError::DuplicateDocument,
            storage_failure(),
        ] {
            let mapped = AppError::document_creation(&err);
            assert_eq!(mapped, AppError::BadRequest(err.to_string()));
        }
    }

    #[test]
    fn document_read_mapping() {
        assert_eq!(
            AppError::document_read(&VaultError::VaultNotFound),
            AppError::NotFound("specified vault does not exist".to_owned())
        );
        assert_eq!(
            AppError::document_read(&VaultError::DocumentNotFound),
            AppError::NotFound("specified document does not exist".to_owned())
        );
        assert_eq!(
            AppError::document_read(&storage_failure()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn internal_is_500() {
        let err = AppError::Internal("unable to escape vaultID path variable".to_owned());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
