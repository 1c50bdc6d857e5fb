//! Core library for the EDV server.
//!
//! Holds the [`vault::VaultCollection`] — the registry of open vault stores
//! that enforces vault and document uniqueness — together with the document
//! model and the error taxonomy the HTTP layer maps onto status codes. This
//! crate depends on `edv-storage` for the provider traits and knows nothing
//! about HTTP.

pub mod document;
pub mod error;
pub mod vault;
