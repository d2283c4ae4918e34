//! Name decorations used to tell colliding assets apart.
//!
//! These strings end up in users' libraries, so any change here breaks
//! recognition of files written by earlier runs. Bump
//! [`SUFFIX_SCHEME_VERSION`] if the scheme ever has to change.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use md5::{Digest, Md5};

/// Version of the decoration scheme below.
pub const SUFFIX_SCHEME_VERSION: u32 = 1;

/// Length of the identifier-derived suffix.
pub const ID_SUFFIX_LEN: usize = 7;

/// Seven URL-safe base64 characters of the MD5 digest of the identifier.
pub fn id7(asset_id: &str) -> String {
    let digest = Md5::digest(asset_id.as_bytes());
    let mut encoded = URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(ID_SUFFIX_LEN);
    encoded
}

/// `base` decorated with the identifier suffix: `IMG_1` → `IMG_1_{id7}`.
pub fn with_id_suffix(base: &str, asset_id: &str) -> String {
    format!("{}_{}", base, id7(asset_id))
}

/// `base` decorated with the size suffix: `IMG_1` → `IMG_1-2048`.
pub fn with_size_suffix(base: &str, size: u64) -> String {
    format!("{}-{}", base, size)
}

/// `base` decorated with a disambiguation counter: `IMG_1-2048` → `IMG_1-2048-2`.
pub fn with_counter(base: &str, counter: u32) -> String {
    format!("{}-{}", base, counter)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id7_is_stable_and_short() {
        let first = id7("AY6c+BsE0jjaXx9tmVGJM1D2VcEO");
        assert_eq!(first.len(), ID_SUFFIX_LEN);
        assert_eq!(first, id7("AY6c+BsE0jjaXx9tmVGJM1D2VcEO"));
        assert_ne!(first, id7("AY6c+BsE0jjaXx9tmVGJM1D2VcEP"));
    }

    #[test]
    fn test_id7_known_value() {
        // md5("") = d41d8cd98f00b204e9800998ecf8427e
        assert_eq!(id7(""), "1B2M2Y8");
    }

    #[test]
    fn test_id7_is_filename_safe() {
        for id in ["a", "b/c", "with space", "日本", "+/+/+/"] {
            let suffix = id7(id);
            assert!(suffix
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
        }
    }

    #[test]
    fn test_decorations() {
        assert_eq!(with_size_suffix("IMG_1234", 2048), "IMG_1234-2048");
        assert_eq!(with_counter("IMG_1234-2048", 2), "IMG_1234-2048-2");
        assert_eq!(
            with_id_suffix("IMG_1234", ""),
            format!("IMG_1234_{}", id7(""))
        );
    }
}
