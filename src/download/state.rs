//! Run state tracking.

use crate::download::decision::{Decision, SkipReason};

/// Counters for one run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunState {
    /// Records read from the source.
    pub records: u64,

    // Decisions
    pub downloaded: u64,
    pub files_downloaded: u64,
    pub bytes_downloaded: u64,
    pub skipped: u64,
    pub legacy: u64,
    pub duplicates: u64,
    pub failed: u64,
    /// Assets a dry run would have fetched.
    pub planned: u64,

    /// Present assets seen in a row, reset by any download.
    pub consecutive_found: u32,

    pub cancelled: bool,
    /// Stopped by the consecutive-found limit.
    pub stopped_early: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a decision before it is acted upon.
    pub fn record_decision(&mut self, decision: &Decision) {
        match decision {
            Decision::Download { .. } => {}
            Decision::Skip { reason, .. } => match reason {
                SkipReason::AlreadyDownloaded => self.skipped += 1,
                SkipReason::LegacyName(_) => {
                    self.skipped += 1;
                    self.legacy += 1;
                }
                SkipReason::DuplicateRecord => self.duplicates += 1,
            },
        }
    }

    /// Track the run of present assets. Returns the new streak length.
    pub fn note_presence(&mut self, decision: &Decision) -> u32 {
        match decision {
            Decision::Skip { reason, .. } if reason.is_present() => {
                self.consecutive_found = self.consecutive_found.saturating_add(1);
            }
            Decision::Skip { .. } => {}
            Decision::Download { .. } => self.consecutive_found = 0,
        }
        self.consecutive_found
    }

    /// Count a fully fetched asset.
    pub fn mark_downloaded(&mut self, files: u64, bytes: u64) {
        self.downloaded += 1;
        self.files_downloaded += files;
        self.bytes_downloaded += bytes;
    }

    pub fn mark_planned(&mut self) {
        self.planned += 1;
    }

    pub fn mark_failed(&mut self) {
        self.failed += 1;
    }

    /// Whether any asset failed.
    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    /// Assets that ended up on disk, fetched now or earlier.
    pub fn total_present(&self) -> u64 {
        self.downloaded + self.skipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::download::decision::NamedAsset;

    fn asset() -> NamedAsset {
        NamedAsset {
            asset_id: "a".to_string(),
            label: "a".to_string(),
            path: PathBuf::from("a.jpg"),
            companion: None,
        }
    }

    fn skip(reason: SkipReason) -> Decision {
        Decision::Skip {
            asset: asset(),
            reason,
        }
    }

    #[test]
    fn test_skip_counters() {
        let mut state = RunState::new();
        state.record_decision(&skip(SkipReason::AlreadyDownloaded));
        state.record_decision(&skip(SkipReason::LegacyName(PathBuf::from("a-original.jpg"))));
        state.record_decision(&skip(SkipReason::DuplicateRecord));

        assert_eq!(state.skipped, 2);
        assert_eq!(state.legacy, 1);
        assert_eq!(state.duplicates, 1);
        assert_eq!(state.total_present(), 2);
    }

    #[test]
    fn test_streak_resets_on_download() {
        let mut state = RunState::new();
        assert_eq!(state.note_presence(&skip(SkipReason::AlreadyDownloaded)), 1);
        assert_eq!(state.note_presence(&skip(SkipReason::DuplicateRecord)), 1);
        assert_eq!(state.note_presence(&skip(SkipReason::AlreadyDownloaded)), 2);

        let download = Decision::Download {
            asset: asset(),
            jobs: Vec::new(),
        };
        assert_eq!(state.note_presence(&download), 0);
    }

    #[test]
    fn test_download_counters() {
        let mut state = RunState::new();
        state.mark_downloaded(2, 300);
        state.mark_failed();
        assert_eq!(state.downloaded, 1);
        assert_eq!(state.files_downloaded, 2);
        assert_eq!(state.bytes_downloaded, 300);
        assert!(state.has_failures());
    }
}
