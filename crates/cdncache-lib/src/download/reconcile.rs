use super::fetch::Fetcher;
use super::types::{DependencyOutcome, ReconcileSummary};
use crate::config::{Block, CdnConfig, Dependency};
use crate::error::CdnCacheError;
use crate::lockfile::{LockEntry, Lockfile};
use crate::utils::write_atomically;
use crate::verification::{LocalFileStat, hash_bytes, stat_local_file};
use futures::stream::{FuturesUnordered, StreamExt};
use std::path::Path;
use tokio::sync::Mutex;
use tracing::{debug, info, trace, warn};

async fn reconcile_dependency(
    block: &Block,
    dependency: &Dependency,
    lockfile: &Mutex<Lockfile>,
    fetcher: &dyn Fetcher,
) -> Result<DependencyOutcome, CdnCacheError> {
    let output_path = block.dependency_path(dependency);
    let url = dependency.url.as_str();
    trace!(block = %block.name, url, output = %output_path.display(), "Checking");

    let recorded_hash = lockfile
        .lock()
        .await
        .find(url, &dependency.filename)
        .map(|entry| entry.hash.clone());

    match recorded_hash {
        None => debug!(url, "No lockfile entry, fetching"),
        Some(recorded_hash) => match stat_local_file(&output_path).await {
            LocalFileStat::Present(hash) if hash == recorded_hash => {
                debug!(url, output = %output_path.display(), "File matches lockfile, skipping download");
                return Ok(DependencyOutcome::UpToDate);
            }
            LocalFileStat::Present(hash) => {
                info!(url, output = %output_path.display(), expected = %recorded_hash, actual = %hash, "File differs from lockfile, fetching");
            }
            LocalFileStat::Absent => {
                info!(url, output = %output_path.display(), "File missing, fetching");
            }
            LocalFileStat::ReadFailed(e) => {
                return Err(CdnCacheError::LocalHashRead {
                    path: output_path,
                    reason: e.to_string(),
                });
            }
        },
    }

    info!(block = %block.name, url, output = %output_path.display(), "Downloading");
    let content = fetcher
        .fetch(url)
        .await
        .map_err(|source| CdnCacheError::Fetch {
            url: url.to_string(),
            source,
        })?;

    write_atomically(&output_path, &content)
        .await
        .map_err(|e| CdnCacheError::DependencyWrite {
            url: url.to_string(),
            path: output_path.clone(),
            reason: e.to_string(),
        })?;

    let hash = hash_bytes(&content);
    info!(url, output = %output_path.display(), hash = %hash, "Downloaded");
    lockfile.lock().await.upsert(LockEntry {
        url: dependency.url.clone(),
        filename: dependency.filename.clone(),
        hash,
    });

    Ok(DependencyOutcome::Fetched)
}

async fn reconcile_block(
    block: &Block,
    lockfile: &Mutex<Lockfile>,
    fetcher: &dyn Fetcher,
) -> Vec<Result<DependencyOutcome, CdnCacheError>> {
    if let Err(e) = tokio::fs::create_dir_all(&block.download_directory).await {
        return vec![Err(CdnCacheError::DownloadDirectoryCreation {
            path: block.download_directory.clone(),
            reason: e.to_string(),
        })];
    }

    block
        .dependencies
        .iter()
        .map(|dependency| reconcile_dependency(block, dependency, lockfile, fetcher))
        .collect::<FuturesUnordered<_>>()
        .collect()
        .await
}

/// Brings every dependency in `config` in line with `lockfile` and returns
/// the updated ledger.
///
/// All dependencies are processed concurrently and driven to completion. If
/// any of them failed, the error is returned and the updated ledger is
/// discarded, so callers never persist partial progress.
pub async fn reconcile_dependencies(
    config: &CdnConfig,
    lockfile: Lockfile,
    fetcher: &dyn Fetcher,
) -> Result<(Lockfile, ReconcileSummary), CdnCacheError> {
    let lockfile = Mutex::new(lockfile.reconcile(config));

    let mut futs = config
        .blocks
        .iter()
        .map(|block| reconcile_block(block, &lockfile, fetcher))
        .collect::<FuturesUnordered<_>>();

    let mut summary = ReconcileSummary::default();
    let mut failures = Vec::new();
    while let Some(results) = futs.next().await {
        for result in results {
            match result {
                Ok(outcome) => summary.record(outcome),
                Err(err) => {
                    warn!("Dependency failed: {}", err);
                    failures.push(err);
                }
            }
        }
    }
    drop(futs);

    match failures.len() {
        0 => Ok((lockfile.into_inner(), summary)),
        1 => Err(failures.remove(0)),
        count => Err(CdnCacheError::DownloadsFailed {
            count,
            details: failures
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; "),
        }),
    }
}

/// Loads the lockfile, reconciles every dependency and persists the result.
pub async fn sync_dependencies(
    config: &CdnConfig,
    lockfile_path: &Path,
    fetcher: &dyn Fetcher,
) -> Result<ReconcileSummary, CdnCacheError> {
    tracing::info!("Loading lockfile from {}", lockfile_path.display());
    let lockfile = Lockfile::load_from_file(lockfile_path).await?;

    let (mut lockfile, summary) = reconcile_dependencies(config, lockfile, fetcher).await?;

    tracing::info!("Saving lockfile to {}", lockfile_path.display());
    lockfile.save_to_file(lockfile_path).await?;

    Ok(summary)
}
