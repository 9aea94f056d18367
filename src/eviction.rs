//! Time-based artifact eviction
//!
//! Every resolved artifact gets a one-shot timer that deletes it once the
//! retention window has passed. Timers are cancellable tasks: an on-demand
//! purge cancels all of them before it empties the directory, so a purge and
//! a timer never both try to delete the same file. Deletion is idempotent
//! anyway; a file that is already gone is not an error.

use crate::error::Result;
use crate::types::{Artifact, Event, JobId};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::sync::{Mutex, broadcast};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Handle describing an armed deletion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvictionTimer {
    /// File that will be deleted
    pub artifact_path: PathBuf,
    /// When it will be deleted
    pub fire_at: Instant,
}

#[derive(Debug)]
struct ArmedTimer {
    generation: u64,
    job_id: JobId,
    fire_at: Instant,
    cancel: CancellationToken,
}

struct SchedulerInner {
    output_dir: PathBuf,
    retention: Duration,
    /// Armed timers keyed by artifact path
    timers: Mutex<HashMap<PathBuf, ArmedTimer>>,
    next_generation: AtomicU64,
    event_tx: broadcast::Sender<Event>,
}

/// Owns the deletion of every resolved artifact (cloneable, all state is shared)
#[derive(Clone)]
pub struct EvictionScheduler {
    inner: Arc<SchedulerInner>,
}

impl EvictionScheduler {
    /// Create a scheduler for `output_dir` that keeps artifacts for `retention`
    pub fn new(
        output_dir: PathBuf,
        retention: Duration,
        event_tx: broadcast::Sender<Event>,
    ) -> Self {
        Self {
            inner: Arc::new(SchedulerInner {
                output_dir,
                retention,
                timers: Mutex::new(HashMap::new()),
                next_generation: AtomicU64::new(0),
                event_tx,
            }),
        }
    }

    /// Retention window applied by [`arm`](Self::arm)
    pub fn retention(&self) -> Duration {
        self.inner.retention
    }

    /// Schedule deletion of `artifact` one retention window from now
    ///
    /// Re-arming the same path replaces the earlier timer.
    pub async fn arm(&self, artifact: &Artifact) -> EvictionTimer {
        let fire_at = Instant::now() + self.inner.retention;
        let generation = self.inner.next_generation.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let path = artifact.path.clone();

        {
            let mut timers = self.inner.timers.lock().await;
            if let Some(previous) = timers.insert(
                path.clone(),
                ArmedTimer {
                    generation,
                    job_id: artifact.job_id.clone(),
                    fire_at,
                    cancel: cancel.clone(),
                },
            ) {
                previous.cancel.cancel();
            }
        }

        debug!(
            job_id = %artifact.job_id,
            file = %artifact.file_name,
            retention_secs = self.inner.retention.as_secs(),
            "eviction armed"
        );

        let inner = self.inner.clone();
        let file_name = artifact.file_name.clone();
        let task_path = path.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!(file = %file_name, "eviction cancelled");
                }
                _ = tokio::time::sleep_until(fire_at) => {
                    {
                        let mut timers = inner.timers.lock().await;
                        if timers.get(&task_path).is_some_and(|t| t.generation == generation) {
                            timers.remove(&task_path);
                        }
                    }
                    match remove_file_if_exists(&task_path).await {
                        Ok(true) => info!(file = %file_name, "artifact evicted"),
                        Ok(false) => debug!(file = %file_name, "artifact already gone at eviction"),
                        Err(e) => warn!(file = %file_name, error = %e, "failed to evict artifact"),
                    }
                    inner.event_tx.send(Event::ArtifactEvicted { file_name }).ok();
                }
            }
        });

        EvictionTimer {
            artifact_path: path,
            fire_at,
        }
    }

    /// Delete every file in the output directory right now
    ///
    /// Cancels all armed timers first. Files that vanish mid-scan are treated
    /// as already gone, and a file that cannot be deleted does not stop the
    /// rest. Returns how many files this call deleted.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory exists but cannot be listed.
    pub async fn purge_all(&self) -> Result<usize> {
        let cancelled = self.cancel_all().await;

        let files = list_files(&self.inner.output_dir, |_| true).await?;
        let deleted = delete_files(&files).await;
        info!(deleted, cancelled_timers = cancelled, "output directory purged");
        self.inner.event_tx.send(Event::Purged { deleted }).ok();
        Ok(deleted)
    }

    /// Delete whatever a failed job left behind
    ///
    /// Removes every file named `<stem>.*` for `job_id`: partial downloads,
    /// `.ytdl` state and format fragments. Failures are logged, never
    /// returned. Returns how many files were removed.
    pub async fn discard_job_files(&self, job_id: &JobId) -> usize {
        let prefix = format!("{}.", job_id.file_stem());
        let files = match list_files(&self.inner.output_dir, |name| name.starts_with(&prefix)).await
        {
            Ok(files) => files,
            Err(e) => {
                warn!(job_id = %job_id, error = %e, "could not list leftovers of failed job");
                return 0;
            }
        };
        let deleted = delete_files(&files).await;
        if deleted > 0 {
            debug!(job_id = %job_id, deleted, "removed leftovers of failed job");
        }
        deleted
    }

    /// Cancel every armed timer without deleting anything
    ///
    /// Returns the number of timers cancelled.
    pub async fn cancel_all(&self) -> usize {
        let drained: Vec<ArmedTimer> = {
            let mut timers = self.inner.timers.lock().await;
            timers.drain().map(|(_, timer)| timer).collect()
        };
        for timer in &drained {
            debug!(job_id = %timer.job_id, "cancelling eviction timer");
            timer.cancel.cancel();
        }
        drained.len()
    }

    /// Number of timers currently armed
    pub async fn armed_count(&self) -> usize {
        self.inner.timers.lock().await.len()
    }

    /// When the artifact at `path` will be deleted, if a timer is armed for it
    pub async fn scheduled_at(&self, path: &Path) -> Option<Instant> {
        self.inner.timers.lock().await.get(path).map(|t| t.fire_at)
    }
}

/// Delete `path`, treating an already-missing file as success
///
/// Returns `true` if this call removed the file.
pub async fn remove_file_if_exists(path: &Path) -> std::io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// Regular files in `dir` whose name passes `keep`; a missing `dir` is empty
async fn list_files(dir: &Path, keep: impl Fn(&str) -> bool) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut entries = match tokio::fs::read_dir(dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!(?dir, "output directory missing");
            return Ok(files);
        }
        Err(e) => return Err(e),
    };
    while let Some(entry) = entries.next_entry().await? {
        if !entry.file_name().to_str().is_some_and(&keep) {
            continue;
        }
        match entry.file_type().await {
            Ok(file_type) if file_type.is_dir() => continue,
            Ok(_) => files.push(entry.path()),
            // Most likely removed since listing
            Err(e) => debug!(file = ?entry.path(), error = %e, "skipping entry"),
        }
    }
    Ok(files)
}

/// Best-effort deletion of `files`; returns how many were actually removed
async fn delete_files(files: &[PathBuf]) -> usize {
    let mut deleted = 0;
    for file in files {
        match remove_file_if_exists(file).await {
            Ok(true) => deleted += 1,
            Ok(false) => debug!(?file, "file already gone"),
            Err(e) => warn!(?file, error = %e, "failed to delete file"),
        }
    }
    deleted
}
