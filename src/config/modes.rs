//! Naming policy definitions.

use chrono::FixedOffset;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How destination folders are derived from the asset creation date.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FolderStructureMode {
    /// Every asset lands directly in the download directory.
    None,
    /// `YYYY`
    Year,
    /// `YYYY/MM`
    YearMonth,
    /// `YYYY/MM/DD` (default).
    #[default]
    YearMonthDay,
    /// Any `strftime` pattern, `/` separating folder levels.
    Custom(String),
}

impl FolderStructureMode {
    /// The `strftime` pattern for date modes, `None` for the flat layout.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            FolderStructureMode::None => None,
            FolderStructureMode::Year => Some("%Y"),
            FolderStructureMode::YearMonth => Some("%Y/%m"),
            FolderStructureMode::YearMonthDay => Some("%Y/%m/%d"),
            FolderStructureMode::Custom(pattern) => Some(pattern),
        }
    }
}

impl fmt::Display for FolderStructureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderStructureMode::None => write!(f, "none"),
            FolderStructureMode::Year => write!(f, "year"),
            FolderStructureMode::YearMonth => write!(f, "year/month"),
            FolderStructureMode::YearMonthDay => write!(f, "year/month/day"),
            FolderStructureMode::Custom(pattern) => write!(f, "{}", pattern),
        }
    }
}

impl FromStr for FolderStructureMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("Folder structure cannot be empty".to_string());
        }

        match trimmed.to_lowercase().as_str() {
            "none" => return Ok(FolderStructureMode::None),
            "year" => return Ok(FolderStructureMode::Year),
            "year/month" => return Ok(FolderStructureMode::YearMonth),
            "year/month/day" => return Ok(FolderStructureMode::YearMonthDay),
            _ => {}
        }

        // Accept the `{:%Y/%m}` spelling used by older configurations.
        let pattern = trimmed
            .strip_prefix("{:")
            .and_then(|p| p.strip_suffix('}'))
            .unwrap_or(trimmed);

        match pattern {
            "%Y" => Ok(FolderStructureMode::Year),
            "%Y/%m" => Ok(FolderStructureMode::YearMonth),
            "%Y/%m/%d" => Ok(FolderStructureMode::YearMonthDay),
            _ => Ok(FolderStructureMode::Custom(pattern.to_string())),
        }
    }
}

impl TryFrom<String> for FolderStructureMode {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FolderStructureMode> for String {
    fn from(mode: FolderStructureMode) -> Self {
        mode.to_string()
    }
}

/// Time zone used to turn creation timestamps into folder segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum FolderTimeZone {
    /// The machine's local zone (default).
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
}

impl fmt::Display for FolderTimeZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FolderTimeZone::Local => write!(f, "local"),
            FolderTimeZone::Utc => write!(f, "utc"),
            FolderTimeZone::Fixed(offset) => write!(f, "{}", offset),
        }
    }
}

impl FromStr for FolderTimeZone {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(FolderTimeZone::Local),
            "utc" | "z" => Ok(FolderTimeZone::Utc),
            other => other
                .parse::<FixedOffset>()
                .map(FolderTimeZone::Fixed)
                .map_err(|_| format!("Unknown time zone: {}", s)),
        }
    }
}

impl TryFrom<String> for FolderTimeZone {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FolderTimeZone> for String {
    fn from(zone: FolderTimeZone) -> Self {
        zone.to_string()
    }
}

/// How colliding file names are told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileMatchPolicy {
    /// First-seen name stays bare, later collisions get a `-{size}` suffix (default).
    #[default]
    NameSizeDedupWithSuffix,
    /// Every name gets a `_{id7}` suffix derived from the asset identifier.
    NameId7,
}

impl fmt::Display for FileMatchPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileMatchPolicy::NameSizeDedupWithSuffix => write!(f, "name-size-dedup-with-suffix"),
            FileMatchPolicy::NameId7 => write!(f, "name-id7"),
        }
    }
}

impl FromStr for FileMatchPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "name-size-dedup-with-suffix" => Ok(FileMatchPolicy::NameSizeDedupWithSuffix),
            "name-id7" => Ok(FileMatchPolicy::NameId7),
            _ => Err(format!("Unknown file match policy: {}", s)),
        }
    }
}

/// How the video half of a live photo is named.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LivePhotoNamePolicy {
    /// Video name is the still name plus a fixed `_HEVC` token (default).
    #[default]
    Suffix,
    /// Video shares the still's base name.
    Original,
}

impl fmt::Display for LivePhotoNamePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LivePhotoNamePolicy::Suffix => write!(f, "suffix"),
            LivePhotoNamePolicy::Original => write!(f, "original"),
        }
    }
}

impl FromStr for LivePhotoNamePolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "suffix" => Ok(LivePhotoNamePolicy::Suffix),
            "original" => Ok(LivePhotoNamePolicy::Original),
            _ => Err(format!("Unknown live photo name policy: {}", s)),
        }
    }
}

/// Rendition of an asset to download.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetSize {
    #[default]
    Original,
    Medium,
    Thumb,
}

impl AssetSize {
    /// Token added to file names of this rendition, none for the original.
    pub fn name_token(self) -> Option<&'static str> {
        match self {
            AssetSize::Original => None,
            AssetSize::Medium => Some("medium"),
            AssetSize::Thumb => Some("thumb"),
        }
    }
}

impl fmt::Display for AssetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetSize::Original => write!(f, "original"),
            AssetSize::Medium => write!(f, "medium"),
            AssetSize::Thumb => write!(f, "thumb"),
        }
    }
}

impl FromStr for AssetSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "original" => Ok(AssetSize::Original),
            "medium" => Ok(AssetSize::Medium),
            "thumb" => Ok(AssetSize::Thumb),
            _ => Err(format!("Unknown asset size: {}", s)),
        }
    }
}

/// Whether non-ASCII characters survive sanitization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnicodePolicy {
    #[default]
    Keep,
    Strip,
}

impl fmt::Display for UnicodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnicodePolicy::Keep => write!(f, "keep"),
            UnicodePolicy::Strip => write!(f, "strip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_folder_structure_parse() {
        assert_eq!(
            "none".parse::<FolderStructureMode>().unwrap(),
            FolderStructureMode::None
        );
        assert_eq!(
            "NONE".parse::<FolderStructureMode>().unwrap(),
            FolderStructureMode::None
        );
        assert_eq!(
            "{:%Y/%m/%d}".parse::<FolderStructureMode>().unwrap(),
            FolderStructureMode::YearMonthDay
        );
        assert_eq!(
            "year/month".parse::<FolderStructureMode>().unwrap(),
            FolderStructureMode::YearMonth
        );
        assert_eq!(
            "{:%Y-%m}".parse::<FolderStructureMode>().unwrap(),
            FolderStructureMode::Custom("%Y-%m".to_string())
        );
        assert!("".parse::<FolderStructureMode>().is_err());
    }

    #[test]
    fn test_folder_structure_pattern() {
        assert_eq!(FolderStructureMode::None.pattern(), None);
        assert_eq!(FolderStructureMode::YearMonthDay.pattern(), Some("%Y/%m/%d"));
        assert_eq!(
            FolderStructureMode::Custom("%Y_%m".to_string()).pattern(),
            Some("%Y_%m")
        );
    }

    #[test]
    fn test_time_zone_parse() {
        assert_eq!(
            "local".parse::<FolderTimeZone>().unwrap(),
            FolderTimeZone::Local
        );
        assert_eq!("UTC".parse::<FolderTimeZone>().unwrap(), FolderTimeZone::Utc);
        let offset = FixedOffset::east_opt(2 * 3600).unwrap();
        assert_eq!(
            "+02:00".parse::<FolderTimeZone>().unwrap(),
            FolderTimeZone::Fixed(offset)
        );
        assert!("mars".parse::<FolderTimeZone>().is_err());
    }

    #[test]
    fn test_policy_names_round_trip_through_display() {
        for policy in [FileMatchPolicy::NameId7, FileMatchPolicy::NameSizeDedupWithSuffix] {
            assert_eq!(policy.to_string().parse::<FileMatchPolicy>().unwrap(), policy);
        }
        for policy in [LivePhotoNamePolicy::Original, LivePhotoNamePolicy::Suffix] {
            assert_eq!(
                policy.to_string().parse::<LivePhotoNamePolicy>().unwrap(),
                policy
            );
        }
    }

    #[test]
    fn test_asset_size_parse_and_token() {
        assert_eq!("Medium".parse::<AssetSize>().unwrap(), AssetSize::Medium);
        assert!("huge".parse::<AssetSize>().is_err());
        assert_eq!(AssetSize::Original.name_token(), None);
        assert_eq!(AssetSize::Thumb.name_token(), Some("thumb"));
        assert_eq!(AssetSize::Thumb.to_string(), "thumb");
    }
}
