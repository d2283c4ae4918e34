//! Download module.
//!
//! Provides:
//! - Asset naming and download decisions
//! - Transfers into the download directory
//! - The run loop and its statistics

pub mod decision;
pub mod namer;
pub mod runner;
pub mod state;
pub mod transfer;

pub use decision::{Decision, FileJob, NamedAsset, SkipReason};
pub use namer::{AssetNamer, Outcome};
pub use runner::{run, RunContext};
pub use state::RunState;
pub use transfer::{HttpTransfer, Transfer};
