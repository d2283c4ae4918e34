//! Fetching file bytes into the download directory.

use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use futures::StreamExt;
use rand::Rng;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::sleep;
use url::Url;
use uuid::Uuid;

use crate::config::DownloadOptions;
use crate::download::decision::FileJob;
use crate::error::{Error, Result};
use crate::fs::probe::PARTIAL_SUFFIX;
use crate::output::create_download_bar;

/// Minimum file size to show progress bar (20 MB).
const PROGRESS_THRESHOLD: u64 = 20 * 1024 * 1024;

/// Upper bound on a single backoff delay.
const MAX_BACKOFF: Duration = Duration::from_secs(60);

const USER_AGENT: &str = concat!("photolib-downloader/", env!("CARGO_PKG_VERSION"));

/// Writes the bytes of one file to `root.join(job.relative_path)`.
///
/// Implementations must never leave a partially written file under the
/// final name.
#[async_trait]
pub trait Transfer: Send + Sync {
    /// Fetch the file and return the number of bytes written.
    async fn fetch(&self, job: &FileJob, root: &Path) -> Result<u64>;
}

/// Transfer over HTTP(S) with retries.
pub struct HttpTransfer {
    client: Client,
    max_retries: u32,
    retry_delay: Duration,
    set_mtime: bool,
    show_progress: bool,
}

impl HttpTransfer {
    pub fn new(options: &DownloadOptions) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| Error::Download(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            max_retries: options.max_retries,
            retry_delay: Duration::from_millis(options.retry_delay_ms),
            set_mtime: options.set_mtime,
            show_progress: options.show_downloads,
        })
    }

    async fn fetch_once(&self, url: &Url, job: &FileJob, target: &Path) -> Result<u64> {
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = partial_path(target);
        match self.stream_to(url, job, &temp, target).await {
            Ok(written) => {
                tokio::fs::rename(&temp, target).await?;
                Ok(written)
            }
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&temp).await {
                    if cleanup.kind() != std::io::ErrorKind::NotFound {
                        tracing::debug!("Could not remove {}: {}", temp.display(), cleanup);
                    }
                }
                Err(e)
            }
        }
    }

    async fn stream_to(&self, url: &Url, job: &FileJob, temp: &Path, target: &Path) -> Result<u64> {
        let response = self.client.get(url.clone()).send().await?;

        if !response.status().is_success() {
            return Err(Error::Download(format!(
                "Failed to download file: HTTP {}",
                response.status()
            )));
        }

        let content_length = response.content_length();
        let show_progress =
            self.show_progress && content_length.map(|l| l > PROGRESS_THRESHOLD).unwrap_or(false);

        let progress = if show_progress {
            Some(create_download_bar(
                content_length.unwrap_or(0),
                &job.relative_path.display().to_string(),
            ))
        } else {
            None
        };

        let mut file = File::create(temp).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded: u64 = 0;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Error::Download(format!("Stream error: {}", e)))?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;

            if let Some(ref pb) = progress {
                pb.set_position(downloaded);
            }
        }

        file.flush().await?;

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        if job.size > 0 && downloaded != job.size {
            return Err(Error::SizeMismatch {
                path: target.to_path_buf(),
                expected: job.size,
                actual: downloaded,
            });
        }

        if self.set_mtime {
            if let Some(created) = job.created {
                let file = file.into_std().await;
                let modified = SystemTime::from(created);
                if let Err(e) = file.set_modified(modified) {
                    tracing::debug!("Could not set mtime on {}: {}", target.display(), e);
                }
            }
        }

        Ok(downloaded)
    }
}

#[async_trait]
impl Transfer for HttpTransfer {
    async fn fetch(&self, job: &FileJob, root: &Path) -> Result<u64> {
        let raw = job
            .url
            .as_deref()
            .ok_or_else(|| Error::MissingUrl(job.asset_id.clone()))?;
        let url = Url::parse(raw)?;
        let target = root.join(&job.relative_path);

        let mut attempt = 0;
        loop {
            match self.fetch_once(&url, job, &target).await {
                Ok(written) => return Ok(written),
                Err(e) if attempt < self.max_retries && is_retryable(&e) => {
                    attempt += 1;
                    let delay = backoff(self.retry_delay, attempt);
                    tracing::warn!(
                        "Download of {} failed ({}), retry {}/{} in {:?}",
                        job.relative_path.display(),
                        e,
                        attempt,
                        self.max_retries,
                        delay
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Temp file next to `target`: `.{name}.{uuid}.part`.
pub fn partial_path(target: &Path) -> PathBuf {
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let temp = format!(".{}.{}{}", name, Uuid::new_v4().simple(), PARTIAL_SUFFIX);
    match target.parent() {
        Some(parent) => parent.join(temp),
        None => PathBuf::from(temp),
    }
}

fn is_retryable(error: &Error) -> bool {
    matches!(
        error,
        Error::Http(_) | Error::Download(_) | Error::SizeMismatch { .. }
    )
}

/// Exponential backoff with up to 50% random jitter.
fn backoff(base: Duration, attempt: u32) -> Duration {
    let factor = 2u32.saturating_pow(attempt.saturating_sub(1));
    let delay = base.saturating_mul(factor).min(MAX_BACKOFF);
    let jitter_ms = (delay.as_millis() / 2) as u64;
    let jitter = if jitter_ms > 0 {
        rand::thread_rng().gen_range(0..=jitter_ms)
    } else {
        0
    };
    delay + Duration::from_millis(jitter)
}
