//! Drives a run: source records in, named files on disk out.

use std::path::Path;

use futures::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::config::DownloadOptions;
use crate::download::decision::{Decision, FileJob, NamedAsset};
use crate::download::namer::{AssetNamer, Outcome};
use crate::download::state::RunState;
use crate::download::transfer::Transfer;
use crate::error::Result;
use crate::fs::FileProbe;
use crate::source::AssetStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// Everything a run needs besides the records and the namer.
pub struct RunContext<'a, T: ?Sized> {
    pub transfer: &'a T,
    pub options: &'a DownloadOptions,
    /// Download directory all decision paths are relative to.
    pub root: &'a Path,
    pub cancel: &'a CancellationToken,
}

/// Consume `assets`, name every record and fetch what is missing.
///
/// Errors scoped to one asset are logged and counted in `state`; the run
/// goes on. Every transfer failure counts as scoped to its asset, local
/// I/O errors included. Anything else aborts the run. Cancellation is checked between
/// records and while a file is transferring; an interrupted transfer leaves
/// at most a `.part` file behind. Live photo halves still waiting for
/// their partner are only flushed when the stream ends normally.
pub async fn run<P, T>(
    mut assets: AssetStream<'_>,
    namer: &mut AssetNamer<P>,
    ctx: &RunContext<'_, T>,
    state: &mut RunState,
) -> Result<()>
where
    P: FileProbe,
    T: Transfer + ?Sized,
{
    loop {
        let next = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                tracing::info!("Cancelled, stopping after {} records", state.records);
                state.cancelled = true;
                return Ok(());
            }
            next = assets.next() => next,
        };

        let record = match next {
            None => break,
            Some(Ok(record)) => record,
            Some(Err(e)) if e.is_per_asset() => {
                tracing::warn!("Skipping record: {}", e);
                state.mark_failed();
                continue;
            }
            Some(Err(e)) => return Err(e),
        };

        state.records += 1;
        for outcome in namer.accept(record) {
            if handle(outcome, ctx, state).await? == Flow::Stop {
                return Ok(());
            }
        }
    }

    for outcome in namer.finish() {
        if handle(outcome, ctx, state).await? == Flow::Stop {
            return Ok(());
        }
    }

    Ok(())
}

async fn handle<T>(outcome: Outcome, ctx: &RunContext<'_, T>, state: &mut RunState) -> Result<Flow>
where
    T: Transfer + ?Sized,
{
    let decision = match outcome {
        Ok(decision) => decision,
        Err(e) if e.is_per_asset() => {
            tracing::warn!("Could not name asset: {}", e);
            state.mark_failed();
            return Ok(Flow::Continue);
        }
        Err(e) => return Err(e),
    };

    state.record_decision(&decision);
    let streak = state.note_presence(&decision);

    match decision {
        Decision::Skip { asset, reason } => {
            if ctx.options.show_skipped_downloads {
                tracing::info!("Skipping {}: {}", asset.path.display(), reason);
            } else {
                tracing::debug!("Skipping {}: {}", asset.path.display(), reason);
            }
        }
        Decision::Download { asset, jobs } => {
            if ctx.options.dry_run {
                for job in &jobs {
                    println!("{}", ctx.root.join(&job.relative_path).display());
                }
                state.mark_planned();
            } else if fetch_all(&asset, &jobs, ctx, state).await? == Flow::Stop {
                return Ok(Flow::Stop);
            }
        }
    }

    if let Some(limit) = ctx.options.until_found {
        if streak >= limit {
            tracing::info!(
                "Found {} consecutive assets already downloaded, stopping",
                streak
            );
            state.stopped_early = true;
            return Ok(Flow::Stop);
        }
    }

    Ok(Flow::Continue)
}

async fn fetch_all<T>(
    asset: &NamedAsset,
    jobs: &[FileJob],
    ctx: &RunContext<'_, T>,
    state: &mut RunState,
) -> Result<Flow>
where
    T: Transfer + ?Sized,
{
    let mut bytes = 0;

    for job in jobs {
        let result = tokio::select! {
            biased;
            _ = ctx.cancel.cancelled() => {
                tracing::info!("Cancelled while downloading {}", job.relative_path.display());
                state.cancelled = true;
                return Ok(Flow::Stop);
            }
            result = ctx.transfer.fetch(job, ctx.root) => result,
        };

        match result {
            Ok(written) => {
                bytes += written;
                if ctx.options.show_downloads {
                    tracing::info!("Downloaded: {}", job.relative_path.display());
                }
            }
            // Transfer errors, local I/O included, only fail this asset.
            Err(e) => {
                tracing::warn!("Failed to download {}: {}", asset.label, e);
                state.mark_failed();
                return Ok(Flow::Continue);
            }
        }
    }

    state.mark_downloaded(jobs.len() as u64, bytes);
    Ok(Flow::Continue)
}
