//! Per-asset naming outcomes.

use std::fmt;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

/// Final paths assigned to an asset, relative to the download directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedAsset {
    pub asset_id: String,
    pub label: String,
    pub path: PathBuf,
    /// Live photo video, when the asset has one.
    pub companion: Option<PathBuf>,
}

/// One file that has to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    /// Identifier of the record the bytes come from.
    pub asset_id: String,
    pub relative_path: PathBuf,
    /// Expected size, `0` when the listing did not report one.
    pub size: u64,
    pub url: Option<String>,
    pub created: Option<DateTime<Utc>>,
}

/// Why nothing has to be fetched for an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Every file of the asset is present with the expected size.
    AlreadyDownloaded,
    /// Present under the `-original` name older releases used.
    LegacyName(PathBuf),
    /// The identifier was already handled earlier in this run.
    DuplicateRecord,
}

impl SkipReason {
    /// Whether the skip means the asset exists locally.
    pub fn is_present(&self) -> bool {
        matches!(self, SkipReason::AlreadyDownloaded | SkipReason::LegacyName(_))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::AlreadyDownloaded => write!(f, "already exists"),
            SkipReason::LegacyName(path) => write!(f, "already exists as {}", path.display()),
            SkipReason::DuplicateRecord => write!(f, "duplicate record"),
        }
    }
}

/// What the layer above should do with an asset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Fetch `jobs`; files of the asset that are already present are left out.
    Download { asset: NamedAsset, jobs: Vec<FileJob> },
    Skip { asset: NamedAsset, reason: SkipReason },
}

impl Decision {
    pub fn asset(&self) -> &NamedAsset {
        match self {
            Decision::Download { asset, .. } | Decision::Skip { asset, .. } => asset,
        }
    }

    pub fn is_skip(&self) -> bool {
        matches!(self, Decision::Skip { .. })
    }
}
