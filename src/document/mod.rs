//! Document state and text transforms.
//!
//! This module provides:
//! - `EmbeddedRegion` and `detect_region` for locating the embedded block
//! - `mask_text` for geometry-preserving masking of host documents
//! - `DocumentEntry` and `DocumentStore` for version-keyed derived state
//! - `LineIndex` for per-line text and length queries

mod mask;
mod region;
mod state;
mod text;

pub use mask::mask_text;
pub use region::{detect_region, EmbeddedRegion};
pub use state::{DocumentEntry, DocumentStore};
pub use text::LineIndex;
