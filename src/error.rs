//! Error types for the photolib-downloader application.

use std::path::PathBuf;

use thiserror::Error;

use crate::config::AssetSize;

/// Main error type for the application.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration value for '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    // Source errors
    #[error("Asset source error: {0}")]
    Source(String),

    #[error("Malformed asset record on line {line}: {message}")]
    MalformedRecord { line: u64, message: String },

    // Naming errors
    #[error("No free name for '{base}' in '{folder}' after {attempts} attempts")]
    NamingExhausted {
        base: String,
        folder: PathBuf,
        attempts: u32,
    },

    #[error("{asset} has no {size} rendition")]
    MissingVariant { asset: String, size: AssetSize },

    // Download errors
    #[error("Download failed: {0}")]
    Download(String),

    #[error("Asset {0} has no download URL")]
    MissingUrl(String),

    #[error("Size mismatch for {path}: expected {expected} bytes, got {actual}")]
    SizeMismatch {
        path: PathBuf,
        expected: u64,
        actual: u64,
    },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    // URL parsing errors
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the error only affects a single asset and the run can go on.
    pub fn is_per_asset(&self) -> bool {
        matches!(
            self,
            Error::NamingExhausted { .. }
                | Error::MissingVariant { .. }
                | Error::MalformedRecord { .. }
                | Error::Download(_)
                | Error::MissingUrl(_)
                | Error::SizeMismatch { .. }
                | Error::Http(_)
                | Error::UrlParse(_)
        )
    }
}

/// Process exit codes.
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const ABORT: i32 = 1;
    pub const SOURCE_ERROR: i32 = 2;
    pub const CONFIG_ERROR: i32 = 3;
    pub const DOWNLOAD_ERROR: i32 = 4;
    pub const UNEXPECTED_ERROR: i32 = 5;
    pub const SOME_ASSETS_FAILED: i32 = 6;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_asset_classification() {
        let exhausted = Error::NamingExhausted {
            base: "IMG_0001".to_string(),
            folder: PathBuf::from("2024/01"),
            attempts: 1000,
        };
        assert!(exhausted.is_per_asset());
        assert!(Error::MissingUrl("abc".to_string()).is_per_asset());
        assert!(Error::MissingVariant {
            asset: "IMG_1.JPG (a)".to_string(),
            size: AssetSize::Medium,
        }
        .is_per_asset());
        assert!(!Error::Config("bad".to_string()).is_per_asset());
        assert!(!Error::Source("gone".to_string()).is_per_asset());
    }

    #[test]
    fn test_naming_exhausted_message() {
        let err = Error::NamingExhausted {
            base: "IMG_0001".to_string(),
            folder: PathBuf::from("2024"),
            attempts: 3,
        };
        assert_eq!(
            err.to_string(),
            "No free name for 'IMG_0001' in '2024' after 3 attempts"
        );
    }
}
