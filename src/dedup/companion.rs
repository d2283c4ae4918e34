//! Live photo video naming.

use crate::config::LivePhotoNamePolicy;

/// Token appended to the still's base name under [`LivePhotoNamePolicy::Suffix`].
pub const LIVE_PHOTO_SUFFIX: &str = "_HEVC";

/// Extension used when the video record carries no usable file name.
pub const DEFAULT_COMPANION_EXTENSION: &str = "MOV";

/// Base name for the video half of a live photo, derived from the still's
/// final base name. The result still goes through collision resolution.
pub fn companion_name(still_base: &str, policy: LivePhotoNamePolicy) -> String {
    match policy {
        LivePhotoNamePolicy::Original => still_base.to_string(),
        LivePhotoNamePolicy::Suffix => format!("{}{}", still_base, LIVE_PHOTO_SUFFIX),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_policy() {
        assert_eq!(
            companion_name("IMG_5678", LivePhotoNamePolicy::Suffix),
            "IMG_5678_HEVC"
        );
    }

    #[test]
    fn test_original_policy() {
        assert_eq!(
            companion_name("IMG_5678_Ab3-x_Q", LivePhotoNamePolicy::Original),
            "IMG_5678_Ab3-x_Q"
        );
    }
}
