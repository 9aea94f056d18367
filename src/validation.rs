//! URL validation against the supported-platform allow-list
//!
//! This is a syntactic check only: a URL is accepted when it contains one of
//! the configured domain substrings. Whether the video actually exists or is
//! public is only discovered when the extractor runs.

use crate::config::PlatformConfig;
use crate::error::DownloadError;

/// Validate a submitted URL
///
/// Returns the URL unchanged on success.
///
/// # Errors
///
/// - [`DownloadError::InvalidInput`] if the URL is missing, empty or whitespace-only
/// - [`DownloadError::UnsupportedPlatform`] if no platform domain occurs in it
pub fn validate_url<'a>(
    url: Option<&'a str>,
    platforms: &[PlatformConfig],
) -> Result<&'a str, DownloadError> {
    let url = match url {
        Some(url) if !url.trim().is_empty() => url,
        _ => return Err(DownloadError::InvalidInput),
    };

    if matching_platform(url, platforms).is_some() {
        Ok(url)
    } else {
        Err(DownloadError::UnsupportedPlatform {
            supported: supported_platforms(platforms),
        })
    }
}

/// Find the first platform with a domain contained in `url`
pub fn matching_platform<'p>(url: &str, platforms: &'p [PlatformConfig]) -> Option<&'p PlatformConfig> {
    platforms
        .iter()
        .find(|p| p.domains.iter().any(|domain| url.contains(domain.as_str())))
}

/// Comma-separated platform names, e.g. "Instagram, Facebook, YouTube, TikTok"
pub fn supported_platforms(platforms: &[PlatformConfig]) -> String {
    platforms
        .iter()
        .map(|p| p.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
