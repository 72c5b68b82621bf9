//! Core data models for the roster viewer.

mod document;
mod lenient;
mod profile;
mod reference;
mod roster;
mod theme;

pub use document::*;
pub use profile::*;
pub use reference::*;
pub use roster::*;
pub use theme::*;
