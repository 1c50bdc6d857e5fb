//! Vault routes: `POST /data-vaults`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode, header};
use axum::response::IntoResponse;
use serde::Deserialize;

use crate::error::AppError;
use crate::state::AppState;

use super::{request_host, vault_location};

/// Body of a vault creation request.
///
/// Only `referenceId` is used; any other configuration members are accepted
/// and ignored. A missing `referenceId` is treated as blank.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataVaultConfiguration {
    #[serde(default)]
    pub reference_id: String,
}

/// Create a data vault.
///
/// Responds `201 Created` with a `Location` header pointing at the vault.
pub async fn create_data_vault(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, AppError> {
    let config: DataVaultConfiguration =
        serde_json::from_slice(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;

    if config.reference_id.is_empty() {
        return Err(AppError::BadRequest("referenceId can't be blank".to_owned()));
    }

    state
        .vaults
        .create_vault(&config.reference_id)
        .await
        .map_err(|e| AppError::vault_creation(&e))?;

    let location = vault_location(request_host(&headers), &config.reference_id);

    Ok((StatusCode::CREATED, [(header::LOCATION, location)]))
}
