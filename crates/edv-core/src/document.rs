//! The structured document stored inside a vault.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A client document: an `id` plus whatever else the client sent.
///
/// Only `id` is interpreted. Every other member is kept verbatim so the
/// stored JSON carries the client's (already encrypted) payload unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredDocument {
    /// Client-chosen identifier, unique within its vault.
    pub id: String,
    /// All remaining members of the document.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl StructuredDocument {
    /// Build a document from an ID and its remaining members.
    #[must_use]
    pub fn new(id: impl Into<String>, fields: Map<String, Value>) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }
}
