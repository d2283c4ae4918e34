//! Deduplication module.
//!
//! Provides:
//! - Claimed-name registries per destination folder
//! - Collision resolution under the configured match policy
//! - Identifier and size based name decorations
//! - Live photo companion naming

pub mod companion;
pub mod registry;
pub mod resolver;
pub mod suffix;

pub use companion::{companion_name, DEFAULT_COMPANION_EXTENSION, LIVE_PHOTO_SUFFIX};
pub use registry::{Claim, ClaimedNameRegistry, FolderRegistry};
pub use resolver::{resolve, resolve_derived, NameRequest, MAX_ATTEMPTS};
pub use suffix::{id7, SUFFIX_SCHEME_VERSION};
