//! Purge and shutdown coordination.

use crate::error::Result;
use crate::types::Event;

use super::VideoDownloader;

impl VideoDownloader {
    /// Delete every file in the output directory now
    ///
    /// Cancels all armed eviction timers first, then deletes best-effort.
    /// Returns how many files were deleted. Works during shutdown too.
    ///
    /// # Errors
    ///
    /// Returns an error only if the output directory cannot be listed.
    pub async fn purge_all(&self) -> Result<usize> {
        tracing::info!("purging output directory");
        self.eviction.purge_all().await
    }

    /// Gracefully shut down the downloader
    ///
    /// This method performs a graceful shutdown sequence:
    /// 1. Stops accepting new downloads (they fail with `ShuttingDown`)
    /// 2. Cancels all armed eviction timers
    /// 3. Emits [`Event::Shutdown`]
    ///
    /// Jobs already running finish normally but their artifacts are no
    /// longer scheduled for deletion once the process exits.
    pub async fn shutdown(&self) {
        tracing::info!("Initiating graceful shutdown");

        self.accepting_new
            .store(false, std::sync::atomic::Ordering::SeqCst);
        tracing::info!("Stopped accepting new downloads");

        let cancelled = self.eviction.cancel_all().await;
        tracing::info!(cancelled, "Cancelled pending eviction timers");

        self.emit_event(Event::Shutdown);
        tracing::info!("Shutdown complete");
    }
}
