//! Photolib Downloader - mirror a remote photo library to local storage
//!
//! This library maps every asset of a photo library listing to a stable,
//! collision-free path below a download directory and fetches what is
//! missing.
//!
//! # Features
//!
//! - Date-based folder layouts with custom strftime patterns
//! - Cross-platform filename sanitization
//! - Size or identifier based collision suffixes
//! - Live photo still/video pairing
//! - Idempotent re-runs: files from earlier runs are recognised
//! - Dry runs and early stop after consecutive existing assets
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use photolib_downloader::{
//!     download::{run, AssetNamer, HttpTransfer, RunContext, RunState},
//!     fs::LocalProbe,
//!     source::open_manifest,
//!     Config,
//! };
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load(Path::new("config.toml"))?;
//!     let root = config.download_directory();
//!     let mut namer = AssetNamer::new(config.naming.clone(), LocalProbe::new(&root));
//!     let transfer = HttpTransfer::new(&config.download)?;
//!     let cancel = CancellationToken::new();
//!     let ctx = RunContext {
//!         transfer: &transfer,
//!         options: &config.download,
//!         root: &root,
//!         cancel: &cancel,
//!     };
//!
//!     let assets = open_manifest(Path::new("assets.jsonl")).await?;
//!     let mut state = RunState::new();
//!     run(assets, &mut namer, &ctx, &mut state).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod config;
pub mod dedup;
pub mod download;
pub mod error;
pub mod fs;
pub mod output;
pub mod source;

// Re-exports for convenience
pub use config::Config;
pub use download::{AssetNamer, Decision, RunState, SkipReason};
pub use error::{Error, Result};
pub use source::{AssetRecord, MediaKind};
