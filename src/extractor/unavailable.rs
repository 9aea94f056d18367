//! Stand-in extractor used when no yt-dlp binary is available

use super::traits::{Extractor, InvocationOutcome};
use crate::types::OutputPathTemplate;
use async_trait::async_trait;

/// Extractor that refuses every request
///
/// Lets the service start (health checks, cleanup, static files keep working)
/// on a host where yt-dlp is not installed; every download then fails with
/// a generic download failure.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableExtractor;

#[async_trait]
impl Extractor for UnavailableExtractor {
    async fn extract(
        &self,
        _url: &str,
        _template: &OutputPathTemplate,
    ) -> crate::Result<InvocationOutcome> {
        Err(crate::Error::ExternalTool(
            "no yt-dlp binary configured or found in PATH".into(),
        ))
    }

    fn name(&self) -> &'static str {
        "unavailable"
    }
}
