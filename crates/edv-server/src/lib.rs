//! EDV HTTP server.
//!
//! Wires the vault collection from `edv-core` and a storage provider from
//! `edv-storage` into an Axum router exposing the three EDV endpoints.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
