//! Mapping of failed extractor runs onto the user-facing error taxonomy

use super::traits::InvocationOutcome;
use crate::config::ClassificationConfig;
use crate::error::DownloadError;
use std::time::Duration;

/// Classifies failed runs by matching known phrases in the tool's stderr
///
/// Phrases are compared case-insensitively. Private/login phrases win over
/// not-found phrases when both occur. Anything unrecognized becomes
/// [`DownloadError::GenericDownloadFailure`]; a run killed at its deadline is
/// always [`DownloadError::SubprocessTimeout`], whatever it printed.
#[derive(Debug, Clone)]
pub struct ErrorClassifier {
    private_patterns: Vec<String>,
    not_found_patterns: Vec<String>,
    timeout: Duration,
}

impl ErrorClassifier {
    /// Build a classifier from configured phrases
    ///
    /// `timeout` is reported back in [`DownloadError::SubprocessTimeout`].
    pub fn new(config: &ClassificationConfig, timeout: Duration) -> Self {
        let lower = |patterns: &[String]| -> Vec<String> {
            patterns
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| p.to_lowercase())
                .collect()
        };
        Self {
            private_patterns: lower(&config.private_patterns),
            not_found_patterns: lower(&config.not_found_patterns),
            timeout,
        }
    }

    /// Classify a run that did not exit cleanly
    pub fn classify(&self, outcome: &InvocationOutcome) -> DownloadError {
        if outcome.timed_out {
            return DownloadError::SubprocessTimeout {
                after: self.timeout,
            };
        }

        let text = outcome.error_text.to_lowercase();
        if self.private_patterns.iter().any(|p| text.contains(p)) {
            DownloadError::PrivateOrLoginRequired
        } else if self.not_found_patterns.iter().any(|p| text.contains(p)) {
            DownloadError::NotFoundOrRemoved
        } else {
            DownloadError::GenericDownloadFailure {
                exit_code: outcome.exit_code,
            }
        }
    }
}
