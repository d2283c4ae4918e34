//! Filesystem module.
//!
//! Provides:
//! - Filename sanitization
//! - Destination folder derivation
//! - Existence/size probing of the download directory

pub mod naming;
pub mod paths;
pub mod probe;

pub use naming::{join_name, sanitize_and_split, sanitize_filename, split_extension, CleanName};
pub use paths::{build_folder, legacy_original_name, UNKNOWN_FOLDER};
pub use probe::{ExistingFile, FileProbe, LocalProbe};
