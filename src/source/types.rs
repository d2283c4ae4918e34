//! Asset record definitions.

use std::borrow::Cow;
use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use md5::{Digest, Md5};
use serde::{Deserialize, Serialize};

use crate::config::AssetSize;

/// Kind of media an asset record describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MediaKind {
    #[default]
    Photo,
    Video,
    LivePhotoStill,
    LivePhotoVideo,
}

/// One asset as reported by the remote library.
///
/// Every field except `size` can be missing in malformed listings; naming
/// falls back to stable substitutes instead of rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Remote identifier, stable across runs.
    #[serde(default)]
    pub id: Option<String>,

    /// File name as reported by the service.
    #[serde(default)]
    pub filename: Option<String>,

    /// Creation timestamp in milliseconds since the Unix epoch.
    #[serde(default)]
    pub created_at: Option<i64>,

    /// Size in bytes.
    #[serde(default)]
    pub size: u64,

    #[serde(default)]
    pub kind: MediaKind,

    /// Link value shared by both halves of a live photo.
    #[serde(default)]
    pub companion_id: Option<String>,

    #[serde(default)]
    pub download_url: Option<String>,

    /// Renditions besides the original, keyed by size.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub variants: BTreeMap<AssetSize, AssetVariant>,
}

/// A smaller rendition of an asset listed next to the original.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetVariant {
    /// Defaults to the record's file name.
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub download_url: Option<String>,
}

/// The file fields of one rendition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rendition<'a> {
    pub filename: Option<&'a str>,
    pub size: u64,
    pub download_url: Option<&'a str>,
}

impl AssetRecord {
    /// Identifier used for ownership and duplicate tracking.
    ///
    /// Records without an identifier get `anon-{md5}` over filename,
    /// timestamp and size, which is stable across runs.
    pub fn asset_id(&self) -> Cow<'_, str> {
        match self.id.as_deref().map(str::trim) {
            Some(id) if !id.is_empty() => Cow::Borrowed(id),
            _ => {
                let mut hasher = Md5::new();
                hasher.update(self.filename.as_deref().unwrap_or("").as_bytes());
                hasher.update(b"|");
                hasher.update(self.created_at.unwrap_or(0).to_string().as_bytes());
                hasher.update(b"|");
                hasher.update(self.size.to_string().as_bytes());
                Cow::Owned(format!("anon-{:x}", hasher.finalize()))
            }
        }
    }

    /// Creation time, if the record carries a usable one.
    pub fn created(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.created_at?).single()
    }

    pub fn original(&self) -> Rendition<'_> {
        Rendition {
            filename: self.filename.as_deref(),
            size: self.size,
            download_url: self.download_url.as_deref(),
        }
    }

    /// The rendition of `size`. The original is the record itself; other
    /// sizes exist only when listed in `variants`.
    pub fn rendition(&self, size: AssetSize) -> Option<Rendition<'_>> {
        match size {
            AssetSize::Original => Some(self.original()),
            other => self.variants.get(&other).map(|variant| Rendition {
                filename: variant.filename.as_deref().or(self.filename.as_deref()),
                size: variant.size,
                download_url: variant.download_url.as_deref(),
            }),
        }
    }

    /// The companion link, if this record is half of a live photo.
    pub fn companion_link(&self) -> Option<&str> {
        match self.kind {
            MediaKind::LivePhotoStill | MediaKind::LivePhotoVideo => self
                .companion_id
                .as_deref()
                .map(str::trim)
                .filter(|link| !link.is_empty()),
            MediaKind::Photo | MediaKind::Video => None,
        }
    }

    /// Short label for log lines.
    pub fn label(&self) -> String {
        match &self.filename {
            Some(name) => format!("{} ({})", name, self.asset_id()),
            None => self.asset_id().into_owned(),
        }
    }
}
