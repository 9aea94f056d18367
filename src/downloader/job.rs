//! One download job, from URL to armed artifact.

use crate::error::{DownloadError, Error, Result};
use crate::extractor::InvocationOutcome;
use crate::types::{Artifact, Event, JobId, OutputPathTemplate};
use crate::{naming, resolver, validation};
use std::sync::atomic::Ordering;

use super::VideoDownloader;

/// Most stderr bytes written to the log per failed run
pub(crate) const MAX_LOGGED_STDERR: usize = 2048;

impl VideoDownloader {
    /// Download `url` and return the resulting artifact
    ///
    /// Validates the URL, names the job, runs the extractor (waiting for a
    /// free slot if `max_concurrent_downloads` runs are active), classifies a
    /// failed run, resolves the produced file and arms its eviction timer.
    /// The returned artifact is deleted one retention window later.
    ///
    /// Everything after naming runs on its own task. Dropping the returned
    /// future does not stop the job: its file is still resolved and armed,
    /// and a failed job's leftovers are still removed.
    ///
    /// # Errors
    ///
    /// - [`Error::Download`] with the matching [`DownloadError`] for every
    ///   expected failure (rejected URL, private video, timeout, ...)
    /// - [`Error::ShuttingDown`] once [`shutdown`](Self::shutdown) was called
    /// - [`Error::Io`] if the output directory cannot be listed
    pub async fn download(&self, url: Option<&str>) -> Result<Artifact> {
        if !self.accepting_new.load(Ordering::SeqCst) {
            return Err(Error::ShuttingDown);
        }

        let url = validation::validate_url(url, &self.config.platforms).inspect_err(|e| {
            tracing::debug!(kind = e.kind(), "rejected download request");
        })?;

        let (job_id, template) = naming::name_job(self.config.output_dir());
        tracing::info!(job_id = %job_id, url = %url, "download started");
        self.emit_event(Event::JobStarted {
            job_id: job_id.clone(),
            url: url.to_string(),
        });

        // Dropping this future must not stop the job
        let downloader = self.clone();
        let url = url.to_string();
        let task_job_id = job_id.clone();
        let task =
            tokio::spawn(async move { downloader.finish_job(url, task_job_id, template).await });

        match task.await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(job_id = %job_id, error = %e, "download task aborted");
                self.emit_event(Event::JobFailed {
                    job_id,
                    kind: "internal_error".to_string(),
                });
                Err(DownloadError::GenericDownloadFailure { exit_code: None }.into())
            }
        }
    }

    async fn finish_job(
        &self,
        url: String,
        job_id: JobId,
        template: OutputPathTemplate,
    ) -> Result<Artifact> {
        match self.run_job(&url, &job_id, &template).await {
            Ok(artifact) => {
                tracing::info!(
                    job_id = %job_id,
                    file = %artifact.file_name,
                    size = artifact.size_bytes,
                    "download complete"
                );
                self.emit_event(Event::JobCompleted {
                    job_id,
                    file_name: artifact.file_name.clone(),
                    size_bytes: artifact.size_bytes,
                });
                Ok(artifact)
            }
            Err(e) => {
                let kind = match &e {
                    Error::Download(download_error) => download_error.kind(),
                    _ => "internal_error",
                };
                tracing::warn!(job_id = %job_id, kind, error = %e, "download failed");
                self.eviction.discard_job_files(&job_id).await;
                self.emit_event(Event::JobFailed {
                    job_id,
                    kind: kind.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn run_job(
        &self,
        url: &str,
        job_id: &JobId,
        template: &OutputPathTemplate,
    ) -> Result<Artifact> {
        let outcome = {
            let _permit = self
                .concurrent_limit
                .acquire()
                .await
                .map_err(|_| Error::ShuttingDown)?;

            match self.extractor.extract(url, template).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    tracing::error!(
                        job_id = %job_id,
                        extractor = self.extractor.name(),
                        error = %e,
                        "extractor could not be run"
                    );
                    return Err(DownloadError::GenericDownloadFailure { exit_code: None }.into());
                }
            }
        };

        if !outcome.exited_cleanly {
            return Err(self.classify_failure(job_id, &outcome).into());
        }

        tracing::debug!(
            job_id = %job_id,
            elapsed_ms = outcome.elapsed.as_millis() as u64,
            "extractor exited cleanly"
        );

        let artifact = resolver::resolve_artifact(self.config.output_dir(), job_id).await?;
        self.eviction.arm(&artifact).await;
        Ok(artifact)
    }

    fn classify_failure(&self, job_id: &JobId, outcome: &InvocationOutcome) -> DownloadError {
        let error = self.classifier.classify(outcome);
        tracing::warn!(
            job_id = %job_id,
            exit_code = ?outcome.exit_code,
            timed_out = outcome.timed_out,
            kind = error.kind(),
            stderr = %truncate_for_log(&outcome.error_text, MAX_LOGGED_STDERR),
            "extractor failed"
        );
        error
    }
}

/// Cut `text` to at most `max` bytes on a char boundary
pub(crate) fn truncate_for_log(text: &str, max: usize) -> &str {
    let text = text.trim_end();
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
