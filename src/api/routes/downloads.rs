//! Download handlers.

use crate::api::AppState;
use crate::error::{DownloadError, Error};
use crate::types::{CleanupResponse, DownloadRequest, DownloadResponse};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

/// POST /download - Download a video
///
/// Blocks until the extractor finishes. The returned `file` path stays valid
/// for the configured retention window.
#[utoipa::path(
    post,
    path = "/api/download",
    tag = "downloads",
    request_body = crate::types::DownloadRequest,
    responses(
        (status = 200, description = "Video downloaded", body = crate::types::DownloadResponse),
        (status = 400, description = "Missing or unsupported URL, private or removed video", body = crate::error::ApiError),
        (status = 500, description = "Download failed or produced no file", body = crate::error::ApiError),
        (status = 503, description = "Server is shutting down", body = crate::error::ApiError)
    )
)]
pub async fn download_video(
    State(state): State<AppState>,
    payload: Result<Json<DownloadRequest>, JsonRejection>,
) -> Result<Json<DownloadResponse>, Error> {
    // Unparseable bodies count as a missing URL
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected download request body");
            return Err(DownloadError::InvalidInput.into());
        }
    };

    let artifact = state.downloader.download(request.url.as_deref()).await?;

    Ok(Json(DownloadResponse::from_artifact(
        &artifact,
        &state.config.server.api.public_prefix,
    )))
}

/// POST /cleanup - Delete every downloaded file
#[utoipa::path(
    post,
    path = "/api/cleanup",
    tag = "downloads",
    responses(
        (status = 200, description = "Files deleted", body = crate::types::CleanupResponse),
        (status = 500, description = "Output directory could not be listed", body = crate::error::ApiError)
    )
)]
pub async fn cleanup(State(state): State<AppState>) -> Result<Json<CleanupResponse>, Error> {
    let deleted = state.downloader.purge_all().await?;
    Ok(Json(CleanupResponse::new(deleted)))
}
