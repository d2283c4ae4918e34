//! Turns asset records into final paths and download decisions.
//!
//! Records are named in arrival order. Live photo halves are held back
//! until both have arrived so the video is always named after the final
//! name of its still. A still that arrives first reserves its video's base
//! name right away. Whatever is still waiting when the stream ends is
//! flushed by [`AssetNamer::finish`].

use std::collections::HashMap;
use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::config::{AssetSize, NamingOptions};
use crate::dedup::{
    companion_name, resolve, resolve_derived, ClaimedNameRegistry, NameRequest,
    DEFAULT_COMPANION_EXTENSION,
};
use crate::download::decision::{Decision, FileJob, NamedAsset, SkipReason};
use crate::error::{Error, Result};
use crate::fs::{
    build_folder, join_name, legacy_original_name, sanitize_and_split, sanitize_filename,
    FileProbe,
};
use crate::source::{AssetRecord, MediaKind, Rendition};

/// Result of naming one asset. Errors are scoped to that asset.
pub type Outcome = Result<Decision>;

/// A file with its final name, before the disk has been checked.
#[derive(Debug, Clone)]
struct NamedFile {
    asset_id: String,
    label: String,
    folder: PathBuf,
    /// Resolved base name without the rendition token.
    root: String,
    relative_path: PathBuf,
    size: u64,
    url: Option<String>,
    created: Option<DateTime<Utc>>,
}

impl NamedFile {
    fn into_job(self) -> FileJob {
        FileJob {
            asset_id: self.asset_id,
            relative_path: self.relative_path,
            size: self.size,
            url: self.url,
            created: self.created,
        }
    }
}

/// A named still whose video has not arrived yet.
#[derive(Debug)]
struct PendingStill {
    link: String,
    still: NamedFile,
    /// Base name reserved for the video.
    companion: String,
}

/// `-{token}` for renditions other than the original.
fn size_tail(size: AssetSize) -> String {
    size.name_token()
        .map(|token| format!("-{}", token))
        .unwrap_or_default()
}

enum Presence {
    Present,
    Legacy(PathBuf),
    Missing,
}

/// Assigns collision-free names to a stream of records.
///
/// One namer covers one run: claims made for an asset hold until the namer
/// is dropped, so a later record can never take a name already handed out.
pub struct AssetNamer<P> {
    options: NamingOptions,
    probe: P,
    registries: ClaimedNameRegistry,
    assigned: HashMap<String, NamedAsset>,
    pending_stills: Vec<PendingStill>,
    pending_videos: Vec<AssetRecord>,
}

impl<P: FileProbe> AssetNamer<P> {
    pub fn new(options: NamingOptions, probe: P) -> Self {
        Self {
            options,
            probe,
            registries: ClaimedNameRegistry::new(),
            assigned: HashMap::new(),
            pending_stills: Vec::new(),
            pending_videos: Vec::new(),
        }
    }

    /// Number of folders touched so far.
    pub fn folder_count(&self) -> usize {
        self.registries.folder_count()
    }

    /// Live photo halves still waiting for their partner.
    pub fn pending(&self) -> usize {
        self.pending_stills.len() + self.pending_videos.len()
    }

    /// Name one record.
    ///
    /// Returns zero outcomes while a live photo half waits for its partner
    /// or when live photo videos are skipped, one otherwise.
    pub fn accept(&mut self, record: AssetRecord) -> Vec<Outcome> {
        let asset_id = record.asset_id().into_owned();

        if let Some(previous) = self.assigned.get(&asset_id) {
            tracing::debug!("Duplicate record for {}", record.label());
            return vec![Ok(Decision::Skip {
                asset: previous.clone(),
                reason: SkipReason::DuplicateRecord,
            })];
        }

        if let Some(path) = self.pending_path(&asset_id) {
            tracing::debug!("Duplicate record for {} while pairing", record.label());
            return vec![Ok(Decision::Skip {
                asset: NamedAsset {
                    asset_id,
                    label: record.label(),
                    path,
                    companion: None,
                },
                reason: SkipReason::DuplicateRecord,
            })];
        }

        if self.options.skip_live_photos && record.kind == MediaKind::LivePhotoVideo {
            tracing::debug!("Skipping live photo video {}", record.label());
            return Vec::new();
        }

        let link = record
            .companion_link()
            .filter(|_| !self.options.skip_live_photos)
            .map(str::to_string);
        match (record.kind, link) {
            (MediaKind::LivePhotoStill, Some(link)) => self.accept_still(&record, asset_id, link),
            (MediaKind::LivePhotoVideo, Some(link)) => self.accept_video(record, link),
            _ => vec![self.name_standalone(&record, asset_id)],
        }
    }

    /// Flush live photo halves whose partner never arrived.
    ///
    /// Stills are emitted without a companion, then orphan videos are named
    /// as ordinary assets in arrival order.
    pub fn finish(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();

        for pending in std::mem::take(&mut self.pending_stills) {
            tracing::debug!("No video arrived for live photo {}", pending.still.label);
            self.registries
                .folder_mut(&pending.still.folder, Vec::new)
                .release(&pending.companion, &pending.still.asset_id);
            outcomes.push(Ok(self.decide(pending.still, None)));
        }

        for video in std::mem::take(&mut self.pending_videos) {
            tracing::debug!("No still arrived for live photo video {}", video.label());
            let asset_id = video.asset_id().into_owned();
            outcomes.push(self.name_standalone(&video, asset_id));
        }

        outcomes
    }

    fn accept_still(&mut self, record: &AssetRecord, asset_id: String, link: String) -> Vec<Outcome> {
        let still = match self.name_file(record, asset_id) {
            Ok(still) => still,
            Err(e) => return vec![Err(e)],
        };

        let waiting = self
            .pending_videos
            .iter()
            .position(|video| video.companion_link() == Some(link.as_str()));

        match waiting {
            Some(index) => {
                let video = self.pending_videos.remove(index);
                vec![self.finish_pair(still, &video, None)]
            }
            None => {
                let companion = format!(
                    "{}{}",
                    companion_name(&still.root, self.options.live_photo_name_policy),
                    size_tail(self.options.live_photo_size)
                );
                let registry = self.registries.folder_mut(&still.folder, Vec::new);
                if !registry.try_reserve(&companion, &still.asset_id) {
                    tracing::debug!(
                        "'{}' is taken, the video of {} gets another name",
                        companion,
                        still.label
                    );
                }
                self.pending_stills.push(PendingStill {
                    link,
                    still,
                    companion,
                });
                Vec::new()
            }
        }
    }

    fn accept_video(&mut self, record: AssetRecord, link: String) -> Vec<Outcome> {
        let waiting = self.pending_stills.iter().position(|p| p.link == link);

        match waiting {
            Some(index) => {
                let pending = self.pending_stills.remove(index);
                vec![self.finish_pair(pending.still, &record, Some(pending.companion))]
            }
            None => {
                self.pending_videos.push(record);
                Vec::new()
            }
        }
    }

    fn name_standalone(&mut self, record: &AssetRecord, asset_id: String) -> Outcome {
        let file = self.name_file(record, asset_id)?;
        Ok(self.decide(file, None))
    }

    /// The requested rendition, or the original when it is missing and
    /// `force_size` is off.
    fn pick_rendition<'r>(
        &self,
        record: &'r AssetRecord,
        wanted: AssetSize,
    ) -> Result<(Rendition<'r>, AssetSize)> {
        if let Some(rendition) = record.rendition(wanted) {
            return Ok((rendition, wanted));
        }
        if self.options.force_size {
            return Err(Error::MissingVariant {
                asset: record.label(),
                size: wanted,
            });
        }
        tracing::debug!(
            "{} has no {} rendition, using the original",
            record.label(),
            wanted
        );
        Ok((record.original(), AssetSize::Original))
    }

    fn name_file(&mut self, record: &AssetRecord, asset_id: String) -> Result<NamedFile> {
        let wanted = match record.kind {
            MediaKind::LivePhotoVideo => self.options.live_photo_size,
            _ => self.options.size,
        };
        let (rendition, size) = self.pick_rendition(record, wanted)?;
        let created = record.created();
        let folder = build_folder(
            created,
            &self.options.folder_structure,
            self.options.time_zone,
        );
        let clean = sanitize_and_split(
            rendition.filename.unwrap_or(""),
            self.options.unicode,
            &asset_id,
        );
        let tail = size_tail(size);

        let probe = &self.probe;
        let seed = self.options.seed_from_disk;
        let registry = self.registries.folder_mut(&folder, || {
            if seed {
                probe.list_dir(&folder)
            } else {
                Vec::new()
            }
        });

        let request = NameRequest {
            base: &clean.stem,
            extension: &clean.extension,
            owner: &asset_id,
            size: rendition.size,
            tail: &tail,
        };
        let base = resolve(registry, &folder, &request, self.options.file_match_policy)?;
        let relative_path = folder.join(clean.with_stem(&base));
        let root = base.strip_suffix(tail.as_str()).unwrap_or(&base).to_string();

        Ok(NamedFile {
            label: record.label(),
            asset_id,
            folder,
            root,
            relative_path,
            size: rendition.size,
            url: rendition.download_url.map(str::to_string),
            created,
        })
    }

    /// Name the video after its still and decide for the pair.
    ///
    /// `reserved` is the base name held for the video since the still
    /// arrived; it is given back once the video has its final name.
    fn finish_pair(
        &mut self,
        still: NamedFile,
        video: &AssetRecord,
        reserved: Option<String>,
    ) -> Outcome {
        let video_id = video.asset_id().into_owned();
        let (rendition, size) = match self.pick_rendition(video, self.options.live_photo_size) {
            Ok(found) => found,
            Err(e) => {
                tracing::warn!("Keeping {} without its video: {}", still.label, e);
                if let Some(reserved) = &reserved {
                    self.registries
                        .folder_mut(&still.folder, Vec::new)
                        .release(reserved, &still.asset_id);
                }
                let decision = self.decide(still, None);
                self.assigned
                    .entry(video_id)
                    .or_insert_with(|| decision.asset().clone());
                return Ok(decision);
            }
        };

        let video_name = sanitize_and_split(
            rendition.filename.unwrap_or(""),
            self.options.unicode,
            &video_id,
        );
        let extension = if video_name.extension.is_empty() {
            DEFAULT_COMPANION_EXTENSION.to_string()
        } else {
            video_name.extension
        };

        let derived = companion_name(&still.root, self.options.live_photo_name_policy);
        let tail = size_tail(size);
        // The still's folder registry exists already, nothing to seed.
        let registry = self.registries.folder_mut(&still.folder, Vec::new);
        let request = NameRequest {
            base: &derived,
            extension: &extension,
            owner: &still.asset_id,
            size: rendition.size,
            tail: &tail,
        };
        let resolved = resolve_derived(registry, &still.folder, &request);
        if let Some(reserved) = &reserved {
            registry.release(reserved, &still.asset_id);
        }
        let base = resolved?;

        let companion = NamedFile {
            asset_id: video_id,
            label: video.label(),
            folder: still.folder.clone(),
            relative_path: still.folder.join(join_name(&base, &extension)),
            root: derived,
            size: rendition.size,
            url: rendition.download_url.map(str::to_string),
            created: video.created().or(still.created),
        };

        Ok(self.decide(still, Some(companion)))
    }

    /// Record the assignment and check which files still have to be fetched.
    fn decide(&mut self, primary: NamedFile, companion: Option<NamedFile>) -> Decision {
        let asset = NamedAsset {
            asset_id: primary.asset_id.clone(),
            label: primary.label.clone(),
            path: primary.relative_path.clone(),
            companion: companion.as_ref().map(|c| c.relative_path.clone()),
        };

        self.assigned.insert(asset.asset_id.clone(), asset.clone());
        if let Some(companion) = &companion {
            self.assigned
                .entry(companion.asset_id.clone())
                .or_insert_with(|| asset.clone());
        }

        let mut jobs = Vec::new();
        let mut legacy = None;
        for file in std::iter::once(primary).chain(companion) {
            match self.presence(&file) {
                Presence::Present => {}
                Presence::Legacy(path) => {
                    legacy.get_or_insert(path);
                }
                Presence::Missing => jobs.push(file.into_job()),
            }
        }

        if !jobs.is_empty() {
            return Decision::Download { asset, jobs };
        }

        let reason = match legacy {
            Some(path) => SkipReason::LegacyName(path),
            None => SkipReason::AlreadyDownloaded,
        };
        Decision::Skip { asset, reason }
    }

    fn presence(&self, file: &NamedFile) -> Presence {
        // A listing without a size accepts whatever is on disk.
        let expected = file.size;
        let matches = |actual: u64| expected == 0 || actual == expected;

        if let Some(actual) = self.probe.size_of(&file.relative_path) {
            if matches(actual) {
                return Presence::Present;
            }
            tracing::debug!(
                "{} has {} bytes, expected {}",
                file.relative_path.display(),
                actual,
                expected
            );
            return Presence::Missing;
        }

        if self.options.detect_legacy_names {
            let name = file.relative_path.file_name().and_then(|n| n.to_str());
            if let Some(name) = name {
                let legacy = file.folder.join(legacy_original_name(name));
                if self.probe.size_of(&legacy).is_some_and(|actual| matches(actual)) {
                    return Presence::Legacy(legacy);
                }
            }
        }

        Presence::Missing
    }

    /// Path shown for a duplicate of a record that is still waiting.
    fn pending_path(&self, asset_id: &str) -> Option<PathBuf> {
        if let Some(pending) = self
            .pending_stills
            .iter()
            .find(|p| p.still.asset_id == asset_id)
        {
            return Some(pending.still.relative_path.clone());
        }

        self.pending_videos
            .iter()
            .find(|video| video.asset_id() == asset_id)
            .map(|video| {
                let folder = build_folder(
                    video.created(),
                    &self.options.folder_structure,
                    self.options.time_zone,
                );
                let name = sanitize_filename(
                    video.filename.as_deref().unwrap_or(""),
                    self.options.unicode,
                    asset_id,
                );
                folder.join(name)
            })
    }
}
