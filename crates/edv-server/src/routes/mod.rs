//! HTTP routes for the EDV server.
//!
//! - `POST /data-vaults` — create a vault
//! - `POST /encrypted-data-vaults/{vaultID}/docs` — create a document
//! - `GET  /encrypted-data-vaults/{vaultID}/docs/{docID}` — read a document

pub mod documents;
pub mod vaults;

use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::extract::path::ErrorKind;
use axum::extract::rejection::PathRejection;
use axum::http::{HeaderMap, HeaderValue, header};
use axum::routing::{get, post};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

/// Path prefix under which vaults and their documents are addressed.
pub const VAULTS_PATH: &str = "/encrypted-data-vaults";

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: Arc<AppState>, body_limit: usize) -> Router {
    Router::new()
        .route("/data-vaults", post(vaults::create_data_vault))
        .route(
            "/encrypted-data-vaults/{vaultID}/docs",
            post(documents::create_document),
        )
        .route(
            "/encrypted-data-vaults/{vaultID}/docs/{docID}",
            get(documents::read_document),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}

/// The request's `Host` header, or an empty string if absent.
///
/// `Location` headers are built as `<host><path>`, matching what EDV clients
/// expect.
fn request_host(headers: &HeaderMap) -> &str {
    headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
}

/// `<host>/encrypted-data-vaults/<vault_id>` with the ID percent-encoded.
fn vault_location(host: &str, vault_id: &str) -> String {
    format!("{host}{VAULTS_PATH}/{}", urlencoding::encode(vault_id))
}

/// `<host>/encrypted-data-vaults/<vault_id>/docs/<doc_id>` with both IDs percent-encoded.
fn document_location(host: &str, vault_id: &str, doc_id: &str) -> String {
    format!(
        "{}/docs/{}",
        vault_location(host, vault_id),
        urlencoding::encode(doc_id)
    )
}

/// Path variables that cannot be percent-decoded mean the router handed us
/// something it should not have, so this is reported as an internal error
/// rather than a client one.
fn unescape_failure(rejection: &PathRejection) -> AppError {
    let variable = match rejection {
        PathRejection::FailedToDeserializePathParams(e) => match e.kind() {
            ErrorKind::InvalidUtf8InPathParam { key } => key.clone(),
            _ => "path".to_owned(),
        },
        _ => "path".to_owned(),
    };

    AppError::Internal(format!(
        "unable to escape {variable} path variable: {}",
        rejection.body_text()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locations_escape_ids() {
        assert_eq!(
            vault_location("edv.example.com", "my vault"),
            "edv.example.com/encrypted-data-vaults/my%20vault"
        );
        assert_eq!(
            document_location("", "v/1", "d?1"),
            "/encrypted-data-vaults/v%2F1/docs/d%3F1"
        );
    }

    #[test]
    fn missing_host_is_empty() {
        assert_eq!(request_host(&HeaderMap::new()), "");
    }
}
