//! Configuration structures and loading logic.

use crate::config::modes::{
    AssetSize, FileMatchPolicy, FolderStructureMode, FolderTimeZone, LivePhotoNamePolicy, UnicodePolicy,
};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub download: DownloadOptions,

    #[serde(default)]
    pub naming: NamingOptions,
}

/// Download options configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadOptions {
    /// Base directory for downloads.
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// JSON Lines asset listing to download from.
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// Only print the paths that would be downloaded.
    #[serde(default)]
    pub dry_run: bool,

    /// Stop after this many consecutive already-present assets.
    #[serde(default)]
    pub until_found: Option<u32>,

    /// Transfer attempts per file after the first one.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Base delay between transfer retries, doubled on every attempt.
    #[serde(default = "default_retry_delay")]
    pub retry_delay_ms: u64,

    /// Set the file modification time to the asset creation time.
    #[serde(default = "default_true")]
    pub set_mtime: bool,

    /// Whether to show download progress.
    #[serde(default = "default_true")]
    pub show_downloads: bool,

    /// Whether to show skipped downloads.
    #[serde(default)]
    pub show_skipped_downloads: bool,
}

impl Default for DownloadOptions {
    fn default() -> Self {
        Self {
            directory: None,
            manifest: None,
            dry_run: false,
            until_found: None,
            max_retries: default_max_retries(),
            retry_delay_ms: default_retry_delay(),
            set_mtime: true,
            show_downloads: true,
            show_skipped_downloads: false,
        }
    }
}

/// Naming engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingOptions {
    /// Folder layout below the download directory.
    #[serde(default)]
    pub folder_structure: FolderStructureMode,

    /// Zone used to derive date folders.
    #[serde(default)]
    pub time_zone: FolderTimeZone,

    /// Collision policy.
    #[serde(default)]
    pub file_match_policy: FileMatchPolicy,

    /// Live photo video naming.
    #[serde(default)]
    pub live_photo_name_policy: LivePhotoNamePolicy,

    /// Keep or strip non-ASCII characters.
    #[serde(default)]
    pub unicode: UnicodePolicy,

    /// Seed each folder's claimed names from the files already on disk.
    #[serde(default = "default_true")]
    pub seed_from_disk: bool,

    /// Treat `NAME-original.EXT` files from older layouts as present.
    #[serde(default = "default_true")]
    pub detect_legacy_names: bool,

    /// Rendition of photos and videos to fetch.
    #[serde(default)]
    pub size: AssetSize,

    /// Rendition of live photo videos to fetch.
    #[serde(default)]
    pub live_photo_size: AssetSize,

    /// Fail assets lacking the requested rendition instead of falling back
    /// to the original.
    #[serde(default)]
    pub force_size: bool,

    /// Fetch live photo stills only.
    #[serde(default)]
    pub skip_live_photos: bool,
}

impl Default for NamingOptions {
    fn default() -> Self {
        Self {
            folder_structure: FolderStructureMode::default(),
            time_zone: FolderTimeZone::default(),
            file_match_policy: FileMatchPolicy::default(),
            live_photo_name_policy: LivePhotoNamePolicy::default(),
            unicode: UnicodePolicy::default(),
            seed_from_disk: true,
            detect_legacy_names: true,
            size: AssetSize::default(),
            live_photo_size: AssetSize::default(),
            force_size: false,
            skip_live_photos: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> u64 {
    500
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.toml",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Get the effective download directory.
    pub fn download_directory(&self) -> PathBuf {
        self.download
            .directory
            .clone()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_from_empty_file() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(
            config.naming.file_match_policy,
            FileMatchPolicy::NameSizeDedupWithSuffix
        );
        assert_eq!(
            config.naming.folder_structure,
            FolderStructureMode::YearMonthDay
        );
        assert!(config.naming.seed_from_disk);
        assert_eq!(config.download.max_retries, 3);
        assert!(!config.download.dry_run);
    }

    #[test]
    fn test_load_full_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[download]
directory = "/photos"
until_found = 25

[naming]
folder_structure = "{{:%Y/%m}}"
time_zone = "utc"
file_match_policy = "name-id7"
live_photo_name_policy = "original"
unicode = "strip"
size = "medium"
skip_live_photos = true
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.download_directory(), PathBuf::from("/photos"));
        assert_eq!(config.download.until_found, Some(25));
        assert_eq!(config.naming.folder_structure, FolderStructureMode::YearMonth);
        assert_eq!(config.naming.time_zone, FolderTimeZone::Utc);
        assert_eq!(config.naming.file_match_policy, FileMatchPolicy::NameId7);
        assert_eq!(
            config.naming.live_photo_name_policy,
            LivePhotoNamePolicy::Original
        );
        assert_eq!(config.naming.unicode, UnicodePolicy::Strip);
        assert_eq!(config.naming.size, AssetSize::Medium);
        assert_eq!(config.naming.live_photo_size, AssetSize::Original);
        assert!(config.naming.skip_live_photos);
        assert!(!config.naming.force_size);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_rejects_unknown_policy() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[naming]\nfile_match_policy = \"name-only\"").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(Error::TomlParse(_))
        ));
    }
}
