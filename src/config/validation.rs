//! Configuration validation logic.

use std::path::Path;

use crate::config::loader::{Config, DownloadOptions, NamingOptions};
use crate::config::modes::{FileMatchPolicy, FolderStructureMode, LivePhotoNamePolicy};
use crate::error::{Error, Result};
use regex::Regex;

/// `strftime` specifiers allowed in custom folder patterns.
const ALLOWED_SPECIFIERS: &str = "YmdHMSjyBbAaeUWVGu";

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_download(&config.download)?;
    validate_naming(&config.naming)?;

    Ok(())
}

/// Validate the download options.
pub fn validate_download(options: &DownloadOptions) -> Result<()> {
    if options.manifest.is_none() {
        return Err(Error::MissingConfig(
            "manifest (asset listing to download from)".to_string(),
        ));
    }

    if let Some(dir) = &options.directory {
        if !options.dry_run && !dir.is_dir() {
            return Err(Error::ConfigValidation {
                field: "directory".to_string(),
                message: format!("Download directory does not exist: {}", dir.display()),
            });
        }
    }

    if options.until_found == Some(0) {
        return Err(Error::ConfigValidation {
            field: "until_found".to_string(),
            message: "Must be at least 1 when set".to_string(),
        });
    }

    Ok(())
}

/// Validate the naming options, including policy combinations.
pub fn validate_naming(options: &NamingOptions) -> Result<()> {
    validate_policy_combination(options.file_match_policy, options.live_photo_name_policy)?;

    if let FolderStructureMode::Custom(pattern) = &options.folder_structure {
        validate_folder_pattern(pattern)?;
    }

    Ok(())
}

/// Reject live photo and collision policies that cannot keep companions unique.
///
/// With `original`, the video shares the still's base name, which is only
/// guaranteed unique when every still name carries the identifier suffix.
pub fn validate_policy_combination(
    file_match: FileMatchPolicy,
    live_photo: LivePhotoNamePolicy,
) -> Result<()> {
    match (live_photo, file_match) {
        (LivePhotoNamePolicy::Original, FileMatchPolicy::NameSizeDedupWithSuffix) => {
            Err(Error::ConfigValidation {
                field: "live_photo_name_policy".to_string(),
                message: "'original' requires file_match_policy = 'name-id7'".to_string(),
            })
        }
        _ => Ok(()),
    }
}

/// Validate a custom `strftime` folder pattern.
pub fn validate_folder_pattern(pattern: &str) -> Result<()> {
    let invalid = |message: String| Error::ConfigValidation {
        field: "folder_structure".to_string(),
        message,
    };

    if pattern.starts_with('/') || pattern.starts_with('\\') || Path::new(pattern).is_absolute() {
        return Err(invalid(format!("Pattern must be relative: '{}'", pattern)));
    }

    if pattern
        .split(['/', '\\'])
        .any(|segment| segment == ".." || segment == ".")
    {
        return Err(invalid(format!(
            "Pattern must not contain '.' or '..' segments: '{}'",
            pattern
        )));
    }

    let specifier = Regex::new(r"%(.?)").unwrap();
    let mut has_date = false;
    for captures in specifier.captures_iter(pattern) {
        let spec = captures.get(1).map(|m| m.as_str()).unwrap_or("");
        if spec == "%" {
            continue;
        }
        if spec.is_empty() || !ALLOWED_SPECIFIERS.contains(spec) {
            return Err(invalid(format!(
                "Unsupported specifier '%{}' in '{}'",
                spec, pattern
            )));
        }
        has_date = true;
    }

    if !has_date {
        return Err(invalid(format!(
            "Pattern has no date specifier: '{}' (use 'none' for a flat layout)",
            pattern
        )));
    }

    Ok(())
}
