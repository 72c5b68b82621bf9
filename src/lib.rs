//! # Roster Lens
//!
//! Reads Warhammer 40k army-list exports and reconciles them with a
//! separately built reference dataset of datasheets and detachments.
//!
//! ## Architecture
//!
//! - **roster**: Flattening the nested selection tree into units and rules
//! - **reference**: Loading reference documents and fuzzy name matching
//! - **session**: Leader attachments and render-ready roster views
//! - **builder**: Generating reference documents from the source tables
//! - **fetch**: Cached HTTP downloads
//! - **storage**: Data directory layout and JSON document IO
//! - **config**: Configuration loading and validation

pub mod builder;
pub mod config;
pub mod fetch;
pub mod models;
pub mod normalize;
pub mod reference;
pub mod roster;
pub mod session;
pub mod storage;

pub use models::*;
pub use normalize::normalize;
