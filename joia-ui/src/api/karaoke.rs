//! Karaoke creation endpoints
//!
//! POST submits a creation job to the external processor and starts its
//! poll task; GET reads the in-memory snapshot the poller maintains;
//! DELETE dismisses the job's surface, which deterministically stops the
//! polling. Nothing here survives a service restart: an interrupted job
//! keeps running on the processor but is no longer observed.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::jobs::client::KaraokeRequest;
use crate::jobs::{poller, JobView};
use crate::AppState;
use joia_common::youtube;

/// POST /api/karaoke
///
/// Local validation happens before any network call; a malformed request
/// never reaches the karaoke service.
pub async fn create_karaoke(
    State(state): State<AppState>,
    Json(request): Json<KaraokeRequest>,
) -> ApiResult<Json<JobView>> {
    if request.youtube_url.trim().is_empty() {
        return Err(ApiError::BadRequest("youtube_url is required".to_string()));
    }
    if youtube::extract_video_id(&request.youtube_url).is_none() {
        return Err(ApiError::BadRequest(
            "youtube_url is not a valid YouTube link".to_string(),
        ));
    }

    let snapshot = state
        .karaoke
        .submit(&request)
        .await
        .map_err(|e| ApiError::Upstream(format!("Failed to start karaoke creation: {}", e)))?;

    let job_id = snapshot.job_id.clone();
    let cancel = state
        .jobs
        .track(snapshot, request.title.clone(), request.artist.clone())
        .await;

    poller::spawn_poll_task(
        state.db.clone(),
        state.karaoke.clone(),
        state.jobs.clone(),
        job_id.clone(),
        cancel,
        state.poll_interval,
    );

    // Freshly tracked, so the view is present
    state
        .jobs
        .view(&job_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::Internal("job vanished during submission".to_string()))
}

/// GET /api/karaoke/:job_id
pub async fn get_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<Json<JobView>> {
    state
        .jobs
        .view(&job_id)
        .await
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("job {}", job_id)))
}

/// DELETE /api/karaoke/:job_id
pub async fn dismiss_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> ApiResult<StatusCode> {
    if state.jobs.dismiss(&job_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("job {}", job_id)))
    }
}

/// Build karaoke creation routes
pub fn karaoke_routes() -> Router<AppState> {
    Router::new()
        .route("/api/karaoke", post(create_karaoke))
        .route("/api/karaoke/:job_id", get(get_job).delete(dismiss_job))
}
