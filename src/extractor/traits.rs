//! Traits and types for extraction tool invocation

use crate::types::OutputPathTemplate;
use async_trait::async_trait;
use std::time::Duration;

/// How one extractor run ended
#[must_use]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutcome {
    /// Process exited on its own with status 0
    pub exited_cleanly: bool,
    /// Exit code, if the process exited on its own
    pub exit_code: Option<i32>,
    /// Captured stderr (lossy UTF-8)
    pub error_text: String,
    /// Process was killed because it ran past its deadline
    pub timed_out: bool,
    /// Wall-clock time the run took
    pub elapsed: Duration,
}

impl InvocationOutcome {
    /// Outcome of a run that exited with status 0
    pub fn success(elapsed: Duration) -> Self {
        Self {
            exited_cleanly: true,
            exit_code: Some(0),
            elapsed,
            ..Default::default()
        }
    }

    /// Outcome of a run that exited with a non-zero status
    pub fn failure(exit_code: Option<i32>, error_text: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            exited_cleanly: false,
            exit_code,
            error_text: error_text.into(),
            timed_out: false,
            elapsed,
        }
    }

    /// Outcome of a run that was killed at its deadline
    pub fn timeout(error_text: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            exited_cleanly: false,
            exit_code: None,
            error_text: error_text.into(),
            timed_out: true,
            elapsed,
        }
    }
}

/// Trait for running the external extraction tool
///
/// Implementations write at most one file whose name starts with the
/// template's stem into the template's directory; the extension is theirs to
/// choose. Implementations must not leave a process running when `extract`
/// returns, including when it returns because of a timeout.
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Fetch `url` into a file following `template`
    ///
    /// # Errors
    ///
    /// Returns an error only when the tool could not be run at all (missing
    /// binary, spawn failure). A tool that ran and failed is reported through
    /// [`InvocationOutcome`].
    async fn extract(
        &self,
        url: &str,
        template: &OutputPathTemplate,
    ) -> crate::Result<InvocationOutcome>;

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}
