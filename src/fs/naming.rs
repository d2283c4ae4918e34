//! Filename sanitization.

use crate::config::UnicodePolicy;

/// Longest stem kept after sanitization, leaving room for dedup suffixes
/// below the common 255-byte NAME_MAX.
pub const MAX_STEM_BYTES: usize = 200;

/// Longest suffix after the last dot still treated as an extension.
pub const MAX_EXTENSION_BYTES: usize = 16;

/// Used when both the name and the identifier sanitize to nothing.
pub const FALLBACK_NAME: &str = "asset";

/// A legal file name split into stem and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanName {
    pub stem: String,
    /// Extension without the dot; empty when the name has none.
    pub extension: String,
}

impl CleanName {
    /// Join a (possibly decorated) stem with this name's extension.
    pub fn with_stem(&self, stem: &str) -> String {
        join_name(stem, &self.extension)
    }
}

/// Join a stem and an extension into a file name.
pub fn join_name(stem: &str, extension: &str) -> String {
    if extension.is_empty() {
        stem.to_string()
    } else {
        format!("{}.{}", stem, extension)
    }
}

/// Sanitize a raw name into a name that is legal on Windows, macOS and Linux.
///
/// Illegal characters are removed rather than replaced so names match what
/// earlier versions of the downloader wrote. Never fails: a name that
/// sanitizes to nothing falls back to `fallback`, then to [`FALLBACK_NAME`].
pub fn sanitize_filename(raw: &str, unicode: UnicodePolicy, fallback: &str) -> String {
    let cleaned = clean(raw, unicode);
    if !cleaned.is_empty() {
        return cleaned;
    }

    let cleaned = clean(fallback, unicode);
    if !cleaned.is_empty() {
        return cleaned;
    }

    FALLBACK_NAME.to_string()
}

/// Sanitize and split a raw name in one go.
pub fn sanitize_and_split(raw: &str, unicode: UnicodePolicy, fallback: &str) -> CleanName {
    let name = sanitize_filename(raw, unicode, fallback);
    let (stem, extension) = split_extension(&name);
    CleanName {
        stem: stem.to_string(),
        extension: extension.to_string(),
    }
}

/// Split `name` at its last dot. A leading dot does not start an extension,
/// and neither does a dot followed by more than [`MAX_EXTENSION_BYTES`].
pub fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(pos)
            if pos > 0 && pos + 1 < name.len() && name.len() - pos - 1 <= MAX_EXTENSION_BYTES =>
        {
            (&name[..pos], &name[pos + 1..])
        }
        _ => (name, ""),
    }
}

fn clean(raw: &str, unicode: UnicodePolicy) -> String {
    let filtered: String = raw
        .chars()
        .filter(|c| !matches!(c, '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .filter(|c| !c.is_control())
        .filter(|c| match unicode {
            UnicodePolicy::Keep => true,
            UnicodePolicy::Strip => c.is_ascii(),
        })
        .collect();

    // Windows drops trailing dots and spaces silently.
    let trimmed = filtered.trim_start_matches(' ').trim_end_matches(['.', ' ']);
    if trimmed.is_empty() {
        return String::new();
    }

    let (stem, extension) = split_extension(trimmed);
    let stem = if stem.len() > MAX_STEM_BYTES {
        truncate_on_char_boundary(stem, MAX_STEM_BYTES).trim_end_matches(['.', ' '])
    } else {
        stem
    };
    if stem.is_empty() {
        return String::new();
    }

    join_name(&guard_device_name(stem), extension)
}

fn truncate_on_char_boundary(value: &str, max_bytes: usize) -> &str {
    if value.len() <= max_bytes {
        return value;
    }
    let mut end = max_bytes;
    while end > 0 && !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

/// Windows reserves a device name before the first dot (`CON.tar.gz` too);
/// such stems get a `_` right after the device name.
fn guard_device_name(stem: &str) -> String {
    let (head, rest) = stem.split_at(stem.find('.').unwrap_or(stem.len()));
    if is_reserved_device_name(head) {
        format!("{}_{}", head, rest)
    } else {
        stem.to_string()
    }
}

/// Device names Windows refuses as a file stem, in any case.
fn is_reserved_device_name(stem: &str) -> bool {
    let upper = stem.to_ascii_uppercase();
    match upper.as_str() {
        "CON" | "PRN" | "AUX" | "NUL" => true,
        _ => {
            let bytes = upper.as_bytes();
            bytes.len() == 4
                && (upper.starts_with("COM") || upper.starts_with("LPT"))
                && (b'1'..=b'9').contains(&bytes[3])
        }
    }
}
