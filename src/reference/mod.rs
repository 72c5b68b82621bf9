//! Reference dataset access and name matching.
//!
//! Reference data enriches a parsed roster with authoritative datasheets and
//! detachment rules. It is always optional: a roster renders from its own
//! profiles when no reference document can be matched or loaded.

pub mod loader;
pub mod matcher;
pub mod store;

use thiserror::Error;

use crate::storage::StorageError;

pub use loader::{FactionReference, ReferenceLoader};
pub use matcher::{lookup_detachment, resolve_faction, NameIndex, CATALOGUE_ALIASES};
pub use store::{DirectoryStore, HttpStore, ReferenceStore};

/// Errors that can occur while retrieving reference documents.
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {document}")]
    HttpStatus { status: u16, document: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reference document not found: {0}")]
    NotFound(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}
