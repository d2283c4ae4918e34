//! Claimed-name tracking per destination folder.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::fs::naming::split_extension;
use crate::fs::probe::ExistingFile;

/// A file found on disk when the folder registry was seeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiskEntry {
    pub extension: String,
    pub size: u64,
}

/// Who holds a base name in a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Claim {
    /// Assigned to an asset during this run.
    Asset(String),
    /// Present on disk from an earlier run, not yet matched to an asset.
    OnDisk(Vec<DiskEntry>),
    /// Held for `owner` before its extension and size are known. Files
    /// found on disk under the name are kept for the final claim.
    Reserved { owner: String, disk: Vec<DiskEntry> },
}

fn disk_matches(entries: &[DiskEntry], extension: &str, size: u64) -> bool {
    // Size 0 means the source did not report one.
    entries
        .iter()
        .any(|e| e.extension.eq_ignore_ascii_case(extension) && (size == 0 || e.size == size))
}

fn disk_conflicts(entries: &[DiskEntry], extension: &str, size: u64) -> bool {
    entries.iter().any(|e| e.extension.eq_ignore_ascii_case(extension))
        && !disk_matches(entries, extension, size)
}

/// Case-insensitive key for a base name.
pub fn fold_key(base: &str) -> String {
    base.to_lowercase()
}

/// Base names claimed in one destination folder.
///
/// Keys are case-folded so names that only differ in case never coexist,
/// whatever the target filesystem does with case.
#[derive(Debug, Default)]
pub struct FolderRegistry {
    claims: HashMap<String, Claim>,
}

impl FolderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the files already present in the folder.
    pub fn seeded(files: &[ExistingFile]) -> Self {
        let mut registry = Self::new();
        for file in files {
            let (stem, extension) = split_extension(&file.name);
            let entry = DiskEntry {
                extension: extension.to_string(),
                size: file.size,
            };
            match registry
                .claims
                .entry(fold_key(stem))
                .or_insert_with(|| Claim::OnDisk(Vec::new()))
            {
                Claim::OnDisk(entries) => entries.push(entry),
                Claim::Asset(_) | Claim::Reserved { .. } => {}
            }
        }
        registry
    }

    /// Claim `base` for `owner` if it is free or already theirs.
    ///
    /// An on-disk claim is taken over when a file with the same extension
    /// and size is present: that file is this asset from an earlier run.
    /// A size of 0 matches any size. A reservation admits only its owner,
    /// and not when a file with the same extension but another size sits
    /// under the name. Returns `false` on a collision; the registry is left
    /// unchanged then.
    pub fn try_claim(&mut self, base: &str, owner: &str, extension: &str, size: u64) -> bool {
        let key = fold_key(base);
        let admitted = match self.claims.get(&key) {
            None => true,
            Some(Claim::Asset(existing)) => existing == owner,
            Some(Claim::OnDisk(entries)) => disk_matches(entries, extension, size),
            Some(Claim::Reserved { owner: holder, disk }) => {
                holder == owner && !disk_conflicts(disk, extension, size)
            }
        };

        if admitted {
            self.claims.insert(key, Claim::Asset(owner.to_string()));
        }
        admitted
    }

    /// Hold `base` for `owner` until [`try_claim`](Self::try_claim) settles
    /// it. Returns `false` when another asset holds the name.
    pub fn try_reserve(&mut self, base: &str, owner: &str) -> bool {
        let key = fold_key(base);
        let disk = match self.claims.get_mut(&key) {
            None => Vec::new(),
            Some(Claim::Asset(existing)) => return existing == owner,
            Some(Claim::Reserved { owner: holder, .. }) => return holder == owner,
            Some(Claim::OnDisk(entries)) => std::mem::take(entries),
        };
        self.claims.insert(
            key,
            Claim::Reserved {
                owner: owner.to_string(),
                disk,
            },
        );
        true
    }

    /// Drop a reservation `owner` no longer needs.
    pub fn release(&mut self, base: &str, owner: &str) {
        let key = fold_key(base);
        if let Some(Claim::Reserved { owner: holder, disk }) = self.claims.get_mut(&key) {
            if holder != owner {
                return;
            }
            if disk.is_empty() {
                self.claims.remove(&key);
            } else {
                let disk = std::mem::take(disk);
                self.claims.insert(key, Claim::OnDisk(disk));
            }
        }
    }

    /// Current holder of `base`, if any.
    pub fn claim(&self, base: &str) -> Option<&Claim> {
        self.claims.get(&fold_key(base))
    }

    /// Number of claimed base names, on-disk ones included.
    pub fn len(&self) -> usize {
        self.claims.len()
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

/// Registries for every folder touched in a run, each independent.
#[derive(Debug, Default)]
pub struct ClaimedNameRegistry {
    folders: HashMap<PathBuf, FolderRegistry>,
}

impl ClaimedNameRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry for `folder`, created from `seed` on first use.
    pub fn folder_mut<F>(&mut self, folder: &Path, seed: F) -> &mut FolderRegistry
    where
        F: FnOnce() -> Vec<ExistingFile>,
    {
        self.folders
            .entry(folder.to_path_buf())
            .or_insert_with(|| FolderRegistry::seeded(&seed()))
    }

    /// Registry for `folder` if it has been used.
    pub fn folder(&self, folder: &Path) -> Option<&FolderRegistry> {
        self.folders.get(folder)
    }

    /// Number of folders seen in this run.
    pub fn folder_count(&self) -> usize {
        self.folders.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn existing(name: &str, size: u64) -> ExistingFile {
        ExistingFile {
            name: name.to_string(),
            size,
        }
    }

    #[test]
    fn test_first_claim_wins() {
        let mut registry = FolderRegistry::new();
        assert!(registry.try_claim("IMG_1", "a", "JPG", 10));
        assert!(!registry.try_claim("IMG_1", "b", "JPG", 10));
        assert_eq!(registry.claim("IMG_1"), Some(&Claim::Asset("a".to_string())));
    }

    #[test]
    fn test_same_owner_reclaims() {
        let mut registry = FolderRegistry::new();
        assert!(registry.try_claim("IMG_1", "a", "HEIC", 10));
        assert!(registry.try_claim("IMG_1", "a", "MOV", 99));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_claims_are_case_insensitive() {
        let mut registry = FolderRegistry::new();
        assert!(registry.try_claim("IMG_1", "a", "JPG", 10));
        assert!(!registry.try_claim("img_1", "b", "jpg", 10));
    }

    #[test]
    fn test_seeded_claim_adopted_on_match() {
        let mut registry = FolderRegistry::seeded(&[existing("IMG_1.JPG", 10)]);
        assert!(!registry.try_claim("IMG_1", "a", "JPG", 11));
        assert!(!registry.try_claim("IMG_1", "a", "PNG", 10));
        assert!(registry.try_claim("img_1", "a", "jpg", 10));
        assert!(!registry.try_claim("IMG_1", "b", "JPG", 10));
    }

    #[test]
    fn test_unknown_size_adopts_seeded_claim() {
        let mut registry = FolderRegistry::seeded(&[existing("IMG_1.JPG", 1234)]);
        assert!(!registry.try_claim("IMG_1", "a", "PNG", 0));
        assert!(registry.try_claim("IMG_1", "a", "JPG", 0));
        assert_eq!(registry.claim("IMG_1"), Some(&Claim::Asset("a".to_string())));
    }

    #[test]
    fn test_reservation_blocks_other_owners() {
        let mut registry = FolderRegistry::new();
        assert!(registry.try_reserve("IMG_1_HEVC", "still"));
        assert!(!registry.try_claim("IMG_1_HEVC", "photo", "JPG", 30));
        assert!(!registry.try_reserve("IMG_1_HEVC", "photo"));
        assert!(registry.try_claim("IMG_1_HEVC", "still", "MOV", 7));
        assert_eq!(
            registry.claim("IMG_1_HEVC"),
            Some(&Claim::Asset("still".to_string()))
        );
    }

    #[test]
    fn test_reservation_keeps_disk_entries() {
        let mut registry = FolderRegistry::seeded(&[existing("IMG_1_HEVC.MOV", 7)]);
        assert!(registry.try_reserve("IMG_1_HEVC", "still"));
        // Same extension, other size: not this video.
        assert!(!registry.try_claim("IMG_1_HEVC", "still", "MOV", 8));
        assert!(registry.try_claim("IMG_1_HEVC", "still", "MOV", 7));
    }

    #[test]
    fn test_release_restores_disk_claim() {
        let mut registry = FolderRegistry::seeded(&[existing("IMG_1_HEVC.MOV", 7)]);
        registry.try_reserve("IMG_1_HEVC", "still");
        registry.try_reserve("IMG_2_HEVC", "other");
        registry.release("IMG_1_HEVC", "somebody-else");
        assert!(matches!(registry.claim("IMG_1_HEVC"), Some(Claim::Reserved { .. })));

        registry.release("IMG_1_HEVC", "still");
        registry.release("IMG_2_HEVC", "other");
        assert!(matches!(registry.claim("IMG_1_HEVC"), Some(Claim::OnDisk(_))));
        assert!(registry.claim("IMG_2_HEVC").is_none());
    }

    #[test]
    fn test_seeded_groups_extensions_under_one_base() {
        let registry = FolderRegistry::seeded(&[
            existing("IMG_1.HEIC", 10),
            existing("IMG_1.MOV", 20),
            existing("IMG_2.JPG", 5),
        ]);
        assert_eq!(registry.len(), 2);
        match registry.claim("IMG_1") {
            Some(Claim::OnDisk(entries)) => assert_eq!(entries.len(), 2),
            other => panic!("unexpected claim: {:?}", other),
        }
    }

    #[test]
    fn test_folders_are_independent_and_seeded_once() {
        let mut registries = ClaimedNameRegistry::new();
        let mut seeds = 0;
        registries
            .folder_mut(Path::new("2024"), || {
                seeds += 1;
                vec![existing("IMG_1.JPG", 10)]
            })
            .try_claim("IMG_2", "a", "JPG", 1);
        registries.folder_mut(Path::new("2024"), || {
            seeds += 1;
            Vec::new()
        });
        assert_eq!(seeds, 1);

        let other = registries.folder_mut(Path::new("2025"), Vec::new);
        assert!(other.try_claim("IMG_2", "b", "JPG", 1));
        assert_eq!(registries.folder_count(), 2);
        assert_eq!(registries.folder(Path::new("2024")).map(|r| r.len()), Some(2));
    }
}
