//! Asset source module.
//!
//! This module provides:
//! - Asset record types
//! - A lazy JSON Lines listing reader

pub mod manifest;
pub mod types;

pub use manifest::{from_records, open_manifest, AssetStream};
pub use types::{AssetRecord, AssetVariant, MediaKind, Rendition};
