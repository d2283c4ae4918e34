//! Destination folder derivation.

use std::fmt::Write;
use std::path::PathBuf;

use chrono::{DateTime, Local, Utc};

use crate::config::{FolderStructureMode, FolderTimeZone, UnicodePolicy};
use crate::fs::naming::{join_name, sanitize_filename, split_extension};

/// Folder for assets whose creation date is missing or unusable.
pub const UNKNOWN_FOLDER: &str = "unknown";

/// Build the folder (relative to the download directory) for an asset.
///
/// Pure: the same timestamp, mode and zone always give the same folder.
pub fn build_folder(
    created: Option<DateTime<Utc>>,
    mode: &FolderStructureMode,
    zone: FolderTimeZone,
) -> PathBuf {
    let pattern = match mode.pattern() {
        Some(pattern) => pattern,
        None => return PathBuf::new(),
    };

    let created = match created {
        Some(created) => created,
        None => return PathBuf::from(UNKNOWN_FOLDER),
    };

    let formatted = match format_in_zone(created, zone, pattern) {
        Some(formatted) => formatted,
        None => {
            tracing::warn!("Could not format {} with '{}'", created, pattern);
            return PathBuf::from(UNKNOWN_FOLDER);
        }
    };

    let mut folder = PathBuf::new();
    for segment in formatted.split(['/', '\\']).filter(|s| !s.is_empty()) {
        folder.push(sanitize_filename(segment, UnicodePolicy::Keep, UNKNOWN_FOLDER));
    }

    if folder.as_os_str().is_empty() {
        PathBuf::from(UNKNOWN_FOLDER)
    } else {
        folder
    }
}

fn format_in_zone(created: DateTime<Utc>, zone: FolderTimeZone, pattern: &str) -> Option<String> {
    // Formatting errors surface through `write!`, `to_string` would panic.
    let mut out = String::new();
    let result = match zone {
        FolderTimeZone::Utc => write!(out, "{}", created.format(pattern)),
        FolderTimeZone::Local => write!(out, "{}", created.with_timezone(&Local).format(pattern)),
        FolderTimeZone::Fixed(offset) => {
            write!(out, "{}", created.with_timezone(&offset).format(pattern))
        }
    };
    result.ok().map(|_| out)
}

/// Name older releases used for full-size downloads: `IMG_1.JPG` → `IMG_1-original.JPG`.
pub fn legacy_original_name(file_name: &str) -> String {
    let (stem, extension) = split_extension(file_name);
    join_name(&format!("{}-original", stem), extension)
}
