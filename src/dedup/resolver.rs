//! Collision resolution within a destination folder.

use std::path::Path;

use crate::config::FileMatchPolicy;
use crate::dedup::registry::FolderRegistry;
use crate::dedup::suffix::{with_counter, with_id_suffix, with_size_suffix};
use crate::error::{Error, Result};

/// Upper bound on candidate names tried for a single asset.
pub const MAX_ATTEMPTS: u32 = 1000;

/// What the resolver needs to know about the asset being named.
#[derive(Debug, Clone, Copy)]
pub struct NameRequest<'a> {
    /// Sanitized base name, without extension.
    pub base: &'a str,
    /// Extension without the dot, may be empty.
    pub extension: &'a str,
    /// Identifier owning the resulting claim.
    pub owner: &'a str,
    pub size: u64,
    /// Appended to every candidate, such as `-medium` for a smaller
    /// rendition. Empty for originals.
    pub tail: &'a str,
}

/// Pick the final base name for `request` and claim it in `registry`.
///
/// Under [`FileMatchPolicy::NameSizeDedupWithSuffix`] candidates are
/// `base`, `base-{size}`, `base-{size}-2`, ...; under
/// [`FileMatchPolicy::NameId7`] they are `base_{id7}`, `base_{id7}-2`, ...
/// The first candidate that is free, already owned by the same asset, or
/// matches a file left by an earlier run wins. Every candidate ends with
/// the request's `tail`, and the returned base includes it.
pub fn resolve(
    registry: &mut FolderRegistry,
    folder: &Path,
    request: &NameRequest<'_>,
    policy: FileMatchPolicy,
) -> Result<String> {
    let decorated = match policy {
        FileMatchPolicy::NameSizeDedupWithSuffix => with_size_suffix(request.base, request.size),
        FileMatchPolicy::NameId7 => with_id_suffix(request.base, request.owner),
    };

    for attempt in 0..MAX_ATTEMPTS {
        let mut candidate = candidate(request.base, &decorated, policy, attempt);
        candidate.push_str(request.tail);
        if registry.try_claim(&candidate, request.owner, request.extension, request.size) {
            if attempt > 0 {
                tracing::debug!(
                    "'{}' collides in '{}', using '{}'",
                    request.base,
                    folder.display(),
                    candidate
                );
            }
            return Ok(candidate);
        }
    }

    Err(Error::NamingExhausted {
        base: request.base.to_string(),
        folder: folder.to_path_buf(),
        attempts: MAX_ATTEMPTS,
    })
}

/// Resolve a name derived from an already resolved one, such as a live
/// photo video named after its still.
///
/// The base already carries any identifier decoration, so candidates are
/// the bare base first and size/counter decorations after it.
pub fn resolve_derived(
    registry: &mut FolderRegistry,
    folder: &Path,
    request: &NameRequest<'_>,
) -> Result<String> {
    resolve(
        registry,
        folder,
        request,
        FileMatchPolicy::NameSizeDedupWithSuffix,
    )
}

fn candidate(base: &str, decorated: &str, policy: FileMatchPolicy, attempt: u32) -> String {
    match policy {
        FileMatchPolicy::NameSizeDedupWithSuffix => match attempt {
            0 => base.to_string(),
            1 => decorated.to_string(),
            n => with_counter(decorated, n),
        },
        FileMatchPolicy::NameId7 => match attempt {
            0 => decorated.to_string(),
            n => with_counter(decorated, n + 1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dedup::registry::Claim;
    use crate::dedup::suffix::id7;
    use crate::fs::probe::ExistingFile;

    fn request<'a>(base: &'a str, owner: &'a str, size: u64) -> NameRequest<'a> {
        NameRequest {
            base,
            extension: "JPG",
            owner,
            size,
            tail: "",
        }
    }

    #[test]
    fn test_size_policy_first_seen_wins() {
        let mut registry = FolderRegistry::new();
        let folder = Path::new("");
        let policy = FileMatchPolicy::NameSizeDedupWithSuffix;

        let first = resolve(&mut registry, folder, &request("IMG_1234", "a", 1000), policy);
        let second = resolve(&mut registry, folder, &request("IMG_1234", "b", 2048), policy);
        assert_eq!(first.unwrap(), "IMG_1234");
        assert_eq!(second.unwrap(), "IMG_1234-2048");
    }

    #[test]
    fn test_size_policy_same_size_duplicates_get_counter() {
        let mut registry = FolderRegistry::new();
        let folder = Path::new("");
        let policy = FileMatchPolicy::NameSizeDedupWithSuffix;

        let names: Vec<String> = ["a", "b", "c", "d"]
            .iter()
            .map(|owner| {
                resolve(&mut registry, folder, &request("IMG_1", owner, 500), policy).unwrap()
            })
            .collect();
        assert_eq!(names, vec!["IMG_1", "IMG_1-500", "IMG_1-500-2", "IMG_1-500-3"]);
    }

    #[test]
    fn test_id7_policy_always_decorates() {
        let mut registry = FolderRegistry::new();
        let name = resolve(
            &mut registry,
            Path::new(""),
            &request("IMG_1", "asset-1", 10),
            FileMatchPolicy::NameId7,
        )
        .unwrap();
        assert_eq!(name, format!("IMG_1_{}", id7("asset-1")));
    }

    #[test]
    fn test_id7_policy_falls_back_to_counter() {
        let mut registry = FolderRegistry::new();
        let taken = format!("IMG_1_{}", id7("asset-1"));
        assert!(registry.try_claim(&taken, "someone-else", "JPG", 1));

        let name = resolve(
            &mut registry,
            Path::new(""),
            &request("IMG_1", "asset-1", 10),
            FileMatchPolicy::NameId7,
        )
        .unwrap();
        assert_eq!(name, format!("{}-2", taken));
    }

    #[test]
    fn test_same_asset_resolves_to_same_name() {
        let mut registry = FolderRegistry::new();
        let policy = FileMatchPolicy::NameSizeDedupWithSuffix;
        let folder = Path::new("");
        resolve(&mut registry, folder, &request("IMG_1", "a", 1), policy).unwrap();
        let second = resolve(&mut registry, folder, &request("IMG_1", "b", 2), policy).unwrap();
        let again = resolve(&mut registry, folder, &request("IMG_1", "b", 2), policy).unwrap();
        assert_eq!(second, again);
    }

    #[test]
    fn test_case_insensitive_collision() {
        let mut registry = FolderRegistry::new();
        let policy = FileMatchPolicy::NameSizeDedupWithSuffix;
        let folder = Path::new("");
        resolve(&mut registry, folder, &request("img_1", "a", 1), policy).unwrap();
        let name = resolve(&mut registry, folder, &request("IMG_1", "b", 2), policy).unwrap();
        assert_eq!(name, "IMG_1-2");
    }

    #[test]
    fn test_previous_run_files_are_recognised() {
        let files = vec![
            ExistingFile {
                name: "IMG_1.JPG".to_string(),
                size: 1000,
            },
            ExistingFile {
                name: "IMG_1-2048.JPG".to_string(),
                size: 2048,
            },
        ];
        let policy = FileMatchPolicy::NameSizeDedupWithSuffix;
        let folder = Path::new("");

        // Arrival order reversed compared to the run that wrote the files.
        let mut registry = FolderRegistry::seeded(&files);
        let b = resolve(&mut registry, folder, &request("IMG_1", "b", 2048), policy).unwrap();
        let a = resolve(&mut registry, folder, &request("IMG_1", "a", 1000), policy).unwrap();
        assert_eq!(a, "IMG_1");
        assert_eq!(b, "IMG_1-2048");
        assert_eq!(registry.claim("IMG_1"), Some(&Claim::Asset("a".to_string())));
    }

    #[test]
    fn test_derived_name_shares_owner_claim() {
        let mut registry = FolderRegistry::new();
        let folder = Path::new("");
        let still = resolve(
            &mut registry,
            folder,
            &request("IMG_1", "still", 10),
            FileMatchPolicy::NameId7,
        )
        .unwrap();

        let video = NameRequest {
            base: &still,
            extension: "MOV",
            owner: "still",
            size: 99,
            tail: "",
        };
        assert_eq!(resolve_derived(&mut registry, folder, &video).unwrap(), still);
    }

    #[test]
    fn test_tail_ends_every_candidate() {
        let mut registry = FolderRegistry::new();
        let folder = Path::new("");
        let policy = FileMatchPolicy::NameSizeDedupWithSuffix;
        fn medium(owner: &str, size: u64) -> NameRequest<'_> {
            NameRequest {
                tail: "-medium",
                ..request("IMG_1", owner, size)
            }
        }

        let a = resolve(&mut registry, folder, &medium("a", 10), policy).unwrap();
        let b = resolve(&mut registry, folder, &medium("b", 20), policy).unwrap();
        let original = resolve(&mut registry, folder, &request("IMG_1", "c", 30), policy).unwrap();
        assert_eq!(a, "IMG_1-medium");
        assert_eq!(b, "IMG_1-20-medium");
        assert_eq!(original, "IMG_1");
    }

    #[test]
    fn test_exhaustion_is_reported() {
        let mut registry = FolderRegistry::new();
        let policy = FileMatchPolicy::NameSizeDedupWithSuffix;
        registry.try_claim("X", "other", "JPG", 1);
        registry.try_claim("X-1", "other", "JPG", 1);
        for n in 2..MAX_ATTEMPTS {
            registry.try_claim(&format!("X-1-{}", n), "other", "JPG", 1);
        }

        let err = resolve(&mut registry, Path::new("f"), &request("X", "a", 1), policy).unwrap_err();
        assert!(matches!(
            err,
            Error::NamingExhausted {
                attempts: MAX_ATTEMPTS,
                ..
            }
        ));
    }
}
