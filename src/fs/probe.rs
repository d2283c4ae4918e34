//! Existence and size checks against the download directory.

use std::path::{Path, PathBuf};

/// Suffix of in-flight transfer files, never treated as downloaded.
pub const PARTIAL_SUFFIX: &str = ".part";

/// A regular file already present in a destination folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistingFile {
    pub name: String,
    pub size: u64,
}

/// Cheap synchronous view of what is already on disk.
///
/// Paths are relative to the download directory.
pub trait FileProbe {
    /// Size of the regular file at `relative`, `None` when it does not exist.
    fn size_of(&self, relative: &Path) -> Option<u64>;

    /// Regular files directly inside `relative_dir`.
    fn list_dir(&self, relative_dir: &Path) -> Vec<ExistingFile>;
}

/// Probe backed by the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalProbe {
    root: PathBuf,
}

impl LocalProbe {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileProbe for LocalProbe {
    fn size_of(&self, relative: &Path) -> Option<u64> {
        let metadata = std::fs::metadata(self.root.join(relative)).ok()?;
        metadata.is_file().then(|| metadata.len())
    }

    fn list_dir(&self, relative_dir: &Path) -> Vec<ExistingFile> {
        let dir = self.root.join(relative_dir);
        let entries = match std::fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!("Could not list {}: {}", dir.display(), e);
                }
                return Vec::new();
            }
        };

        let mut files = Vec::new();
        for entry in entries.flatten() {
            let metadata = match entry.metadata() {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            };

            let name = match entry.file_name().into_string() {
                Ok(name) => name,
                Err(_) => continue,
            };

            if is_partial(&name) {
                continue;
            }

            files.push(ExistingFile {
                name,
                size: metadata.len(),
            });
        }

        // read_dir order is platform dependent.
        files.sort_by(|a, b| a.name.cmp(&b.name));
        files
    }
}

/// Whether a file name belongs to an unfinished transfer.
pub fn is_partial(name: &str) -> bool {
    name.starts_with('.') && name.ends_with(PARTIAL_SUFFIX)
}

/// In-memory probe for tests.
#[cfg(test)]
#[derive(Debug, Default, Clone)]
pub(crate) struct MemoryProbe {
    pub files: std::collections::BTreeMap<PathBuf, u64>,
}

#[cfg(test)]
impl MemoryProbe {
    pub fn with_file(mut self, relative: impl Into<PathBuf>, size: u64) -> Self {
        self.files.insert(relative.into(), size);
        self
    }
}

#[cfg(test)]
impl FileProbe for MemoryProbe {
    fn size_of(&self, relative: &Path) -> Option<u64> {
        self.files.get(relative).copied()
    }

    fn list_dir(&self, relative_dir: &Path) -> Vec<ExistingFile> {
        self.files
            .iter()
            .filter(|(path, _)| path.parent().unwrap_or(Path::new("")) == relative_dir)
            .filter_map(|(path, size)| {
                let name = path.file_name()?.to_str()?.to_string();
                Some(ExistingFile { name, size: *size })
            })
            .collect()
    }
}
