//! Artifact resolution
//!
//! After the extractor reports a clean exit, the job's file is located by
//! scanning the shared output directory for its `video_<timestamp>_<suffix>`
//! stem. The extractor picks the extension, so the exact name cannot be known
//! in advance.

use crate::error::{DownloadError, Result};
use crate::types::{Artifact, JobId};
use std::path::Path;
use tokio::fs;
use tracing::{debug, warn};

/// Extensions of scratch files the extractor writes while it works
const SCRATCH_EXTENSIONS: &[&str] = &["part", "ytdl", "temp", "tmp"];

/// Locate the file produced for `job_id` inside `output_dir`
///
/// Must only be called after the extractor exited cleanly.
///
/// # Errors
///
/// - [`DownloadError::ArtifactMissing`] if no finished file for the job exists
/// - [`crate::Error::Io`] if the directory cannot be read
pub async fn resolve_artifact(output_dir: &Path, job_id: &JobId) -> Result<Artifact> {
    let stem = job_id.file_stem();
    let mut candidates: Vec<String> = Vec::new();

    let mut entries = fs::read_dir(output_dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            continue;
        };
        if !name.contains(&stem) || is_scratch_file(&name) {
            continue;
        }
        match entry.file_type().await {
            Ok(file_type) if file_type.is_file() => candidates.push(name),
            Ok(_) => {}
            Err(e) => debug!(file = %name, error = %e, "skipping unreadable entry"),
        }
    }

    let Some(file_name) = pick_candidate(&stem, candidates) else {
        warn!(job_id = %job_id, dir = ?output_dir, "extractor exited cleanly but produced no file");
        return Err(DownloadError::ArtifactMissing.into());
    };

    let path = output_dir.join(&file_name);
    let metadata = match fs::metadata(&path).await {
        Ok(metadata) => metadata,
        // Deleted between listing and stat
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(DownloadError::ArtifactMissing.into());
        }
        Err(e) => return Err(e.into()),
    };

    debug!(job_id = %job_id, file = %file_name, size = metadata.len(), "artifact resolved");

    Ok(Artifact {
        path,
        file_name,
        size_bytes: metadata.len(),
        job_id: job_id.clone(),
    })
}

fn is_scratch_file(name: &str) -> bool {
    // ffmpeg merges into `<stem>.temp.<ext>` before renaming
    if name.contains(".temp.") {
        return true;
    }
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            SCRATCH_EXTENSIONS
                .iter()
                .any(|scratch| ext.eq_ignore_ascii_case(scratch))
        })
}

/// Prefer `<stem>.<ext>` over intermediate names like `<stem>.f137.mp4`
fn pick_candidate(stem: &str, mut candidates: Vec<String>) -> Option<String> {
    candidates.sort();
    let exact = candidates.iter().position(|name| {
        name.strip_prefix(stem)
            .and_then(|rest| rest.strip_prefix('.'))
            .is_some_and(|ext| !ext.is_empty() && !ext.contains('.'))
    });
    match exact {
        Some(index) => Some(candidates.swap_remove(index)),
        None => candidates.into_iter().next(),
    }
}
