//! Configuration module for the photolib-downloader.
//!
//! This module handles:
//! - Loading configuration from TOML files
//! - Naming policy definitions
//! - Configuration validation

pub mod loader;
pub mod modes;
pub mod validation;

pub use loader::{Config, DownloadOptions, NamingOptions};
pub use modes::{
    AssetSize, FileMatchPolicy, FolderStructureMode, FolderTimeZone, LivePhotoNamePolicy, UnicodePolicy,
};
pub use validation::{validate_config, validate_naming};
