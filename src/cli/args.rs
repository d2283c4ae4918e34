//! Command-line argument definitions using clap.

use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use std::path::PathBuf;

use crate::config::{
    AssetSize, Config, FileMatchPolicy, FolderStructureMode, FolderTimeZone, LivePhotoNamePolicy,
    UnicodePolicy,
};

/// Config file looked up in the working directory when no platform
/// config directory is available.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Photo library downloader CLI.
#[derive(Parser, Debug)]
#[command(
    name = "photolib-downloader",
    version,
    about = "Mirror a remote photo library to local storage",
    long_about = "Downloads every asset of a photo library listing into date-based folders.\n\n\
                  File names are deterministic and collision-free, so repeated runs skip\n\
                  what is already on disk instead of fetching or renaming it."
)]
pub struct Args {
    /// Base directory for downloads.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// JSON Lines asset listing to download.
    #[arg(short, long, env = "PHOTOLIB_MANIFEST")]
    pub manifest: Option<PathBuf>,

    /// Path to configuration file.
    #[arg(short, long, env = "PHOTOLIB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Folder layout: none, year, year/month, year/month/day or a strftime
    /// pattern such as "%Y/%m".
    #[arg(long)]
    pub folder_structure: Option<FolderStructureMode>,

    /// Time zone for date folders: local, utc or an offset like +02:00.
    #[arg(long)]
    pub time_zone: Option<FolderTimeZone>,

    /// How colliding file names are told apart.
    #[arg(long, value_enum)]
    pub file_match_policy: Option<FileMatchPolicyArg>,

    /// How the video half of a live photo is named.
    #[arg(long = "live-photo-mov-filename-policy", value_enum)]
    pub live_photo_policy: Option<LivePhotoPolicyArg>,

    /// Rendition of photos to download.
    #[arg(long, value_enum)]
    pub size: Option<SizeArg>,

    /// Rendition of live photo videos to download.
    #[arg(long, value_enum)]
    pub live_photo_size: Option<SizeArg>,

    /// Fail assets that lack the requested size instead of downloading the
    /// original.
    #[arg(long)]
    pub force_size: bool,

    /// Don't download the video half of live photos.
    #[arg(long)]
    pub skip_live_photos: bool,

    /// Remove non-ASCII characters from file names.
    #[arg(long)]
    pub strip_unicode: bool,

    /// Don't treat files already in a folder as claimed names.
    #[arg(long)]
    pub no_seed: bool,

    /// Don't recognise NAME-original.EXT files from older layouts.
    #[arg(long)]
    pub no_legacy_names: bool,

    /// Only print the paths that would be downloaded.
    #[arg(long, alias = "only-print-filenames")]
    pub dry_run: bool,

    /// Stop after this many consecutive assets that are already downloaded.
    #[arg(long)]
    pub until_found: Option<u32>,

    /// Retries per file after a failed transfer.
    #[arg(long)]
    pub max_retries: Option<u32>,

    /// Keep the download time as modification time.
    #[arg(long)]
    pub no_mtime: bool,

    /// Hide download progress information.
    #[arg(long, short)]
    pub quiet: bool,

    /// Show information about skipped downloads.
    #[arg(long)]
    pub show_skipped: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

/// CLI file match policy argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FileMatchPolicyArg {
    /// Keep the name, add the size on collisions.
    NameSizeDedupWithSuffix,
    /// Always add a short identifier hash.
    NameId7,
}

impl From<FileMatchPolicyArg> for FileMatchPolicy {
    fn from(arg: FileMatchPolicyArg) -> Self {
        match arg {
            FileMatchPolicyArg::NameSizeDedupWithSuffix => FileMatchPolicy::NameSizeDedupWithSuffix,
            FileMatchPolicyArg::NameId7 => FileMatchPolicy::NameId7,
        }
    }
}

/// CLI live photo video naming argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LivePhotoPolicyArg {
    /// Still name plus "_HEVC".
    Suffix,
    /// Same base name as the still.
    Original,
}

impl From<LivePhotoPolicyArg> for LivePhotoNamePolicy {
    fn from(arg: LivePhotoPolicyArg) -> Self {
        match arg {
            LivePhotoPolicyArg::Suffix => LivePhotoNamePolicy::Suffix,
            LivePhotoPolicyArg::Original => LivePhotoNamePolicy::Original,
        }
    }
}

/// CLI rendition argument.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SizeArg {
    Original,
    Medium,
    Thumb,
}

impl From<SizeArg> for AssetSize {
    fn from(arg: SizeArg) -> Self {
        match arg {
            SizeArg::Original => AssetSize::Original,
            SizeArg::Medium => AssetSize::Medium,
            SizeArg::Thumb => AssetSize::Thumb,
        }
    }
}

impl Args {
    /// Config file to load: `--config`, else the platform config directory,
    /// else `config.toml` in the working directory.
    pub fn config_path(&self) -> PathBuf {
        if let Some(path) = &self.config {
            return path.clone();
        }

        ProjectDirs::from("", "", "photolib-downloader")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME))
    }

    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(self, config: &mut Config) {
        if let Some(dir) = self.download_directory {
            config.download.directory = Some(dir);
        }

        if let Some(manifest) = self.manifest {
            config.download.manifest = Some(manifest);
        }

        if let Some(mode) = self.folder_structure {
            config.naming.folder_structure = mode;
        }

        if let Some(zone) = self.time_zone {
            config.naming.time_zone = zone;
        }

        if let Some(policy) = self.file_match_policy {
            config.naming.file_match_policy = policy.into();
        }

        if let Some(policy) = self.live_photo_policy {
            config.naming.live_photo_name_policy = policy.into();
        }

        if let Some(size) = self.size {
            config.naming.size = size.into();
        }

        if let Some(size) = self.live_photo_size {
            config.naming.live_photo_size = size.into();
        }

        // Boolean flags (only override if set to non-default)
        if self.force_size {
            config.naming.force_size = true;
        }

        if self.skip_live_photos {
            config.naming.skip_live_photos = true;
        }

        if self.strip_unicode {
            config.naming.unicode = UnicodePolicy::Strip;
        }

        if self.no_seed {
            config.naming.seed_from_disk = false;
        }

        if self.no_legacy_names {
            config.naming.detect_legacy_names = false;
        }

        if self.dry_run {
            config.download.dry_run = true;
        }

        if let Some(limit) = self.until_found {
            config.download.until_found = Some(limit);
        }

        if let Some(retries) = self.max_retries {
            config.download.max_retries = retries;
        }

        if self.no_mtime {
            config.download.set_mtime = false;
        }

        if self.quiet {
            config.download.show_downloads = false;
            config.download.show_skipped_downloads = false;
        }

        if self.show_skipped {
            config.download.show_skipped_downloads = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "photolib-downloader",
            "-d",
            "/photos",
            "--manifest",
            "assets.jsonl",
            "--folder-structure",
            "year/month",
            "--time-zone",
            "utc",
            "--file-match-policy",
            "name-id7",
            "--live-photo-mov-filename-policy",
            "original",
            "--strip-unicode",
            "--until-found",
            "50",
            "--only-print-filenames",
        ]);

        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.download.directory, Some(PathBuf::from("/photos")));
        assert_eq!(config.download.manifest, Some(PathBuf::from("assets.jsonl")));
        assert_eq!(config.naming.folder_structure, FolderStructureMode::YearMonth);
        assert_eq!(config.naming.time_zone, FolderTimeZone::Utc);
        assert_eq!(config.naming.file_match_policy, FileMatchPolicy::NameId7);
        assert_eq!(
            config.naming.live_photo_name_policy,
            LivePhotoNamePolicy::Original
        );
        assert_eq!(config.naming.unicode, UnicodePolicy::Strip);
        assert_eq!(config.download.until_found, Some(50));
        assert!(config.download.dry_run);
    }

    #[test]
    fn test_unset_flags_keep_config() {
        let args = Args::parse_from(["photolib-downloader"]);
        let mut config = Config::default();
        config.naming.file_match_policy = FileMatchPolicy::NameId7;
        config.download.max_retries = 7;

        args.merge_into_config(&mut config);
        assert_eq!(config.naming.file_match_policy, FileMatchPolicy::NameId7);
        assert_eq!(config.download.max_retries, 7);
        assert!(config.naming.seed_from_disk);
    }

    #[test]
    fn test_quiet_hides_progress() {
        let args = Args::parse_from(["photolib-downloader", "--quiet", "--no-mtime"]);
        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert!(!config.download.show_downloads);
        assert!(!config.download.set_mtime);
    }

    #[test]
    fn test_size_flags() {
        let args = Args::parse_from([
            "photolib-downloader",
            "--size",
            "medium",
            "--live-photo-size",
            "thumb",
            "--force-size",
            "--skip-live-photos",
        ]);
        let mut config = Config::default();
        args.merge_into_config(&mut config);
        assert_eq!(config.naming.size, AssetSize::Medium);
        assert_eq!(config.naming.live_photo_size, AssetSize::Thumb);
        assert!(config.naming.force_size);
        assert!(config.naming.skip_live_photos);
    }

    #[test]
    fn test_explicit_config_path_wins() {
        let args = Args::parse_from(["photolib-downloader", "-c", "/etc/photolib.toml"]);
        assert_eq!(args.config_path(), PathBuf::from("/etc/photolib.toml"));
    }
}
