//! Document routes: `/encrypted-data-vaults/{vaultID}/docs[/{docID}]`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;

use edv_core::document::StructuredDocument;

use crate::error::AppError;
use crate::state::AppState;

use super::{document_location, request_host, unescape_failure};

/// Path variables of the document collection route.
#[derive(Debug, Deserialize)]
pub struct VaultPath {
    #[serde(rename = "vaultID")]
    pub vault_id: String,
}

/// Path variables of a single document route.
#[derive(Debug, Deserialize)]
pub struct DocumentPath {
    #[serde(rename = "vaultID")]
    pub vault_id: String,
    #[serde(rename = "docID")]
    pub doc_id: String,
}

/// Create a document inside a vault.
///
/// The body is decoded before the path is inspected, so a malformed body is
/// reported even when the vault ID is also bad.
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    path: Result<Path<VaultPath>, PathRejection>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let document: StructuredDocument =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if document.id.is_empty() {
        return Err(AppError::BadRequest("document id can't be blank".to_owned()));
    }

    let Path(VaultPath { vault_id }) = path.map_err(|e| unescape_failure(&e))?;

    state
        .vaults
        .create_document(&vault_id, &document)
        .await
        .map_err(|e| AppError::document_creation(&e))?;

    let location = document_location(request_host(&headers), &vault_id, &document.id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}

/// Read a document. The body is exactly the bytes stored at creation.
pub async fn read_document(
    State(state): State<Arc<AppState>>,
    path: Result<Path<DocumentPath>, PathRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Path(DocumentPath { vault_id, doc_id }) = path.map_err(|e| unescape_failure(&e))?;

    let document_json = state
        .vaults
        .read_document(&vault_id, &doc_id)
        .await
        .map_err(|e| AppError::document_read(&e))?;

    Ok((
        [(header::CONTENT_TYPE, "application/json")],
        document_json,
    ))
}
