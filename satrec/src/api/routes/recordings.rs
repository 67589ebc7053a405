//! Recording lifecycle routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{
    RecordingResponse, StartRecordingRequest, StartRecordingResponse, StopAllResponse,
    StopRecordingResponse,
};
use crate::api::server::AppState;

/// Create the recordings router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(list_recordings)
                .post(start_recording)
                .delete(stop_all_recordings),
        )
        .route("/{name}", get(get_recording).delete(stop_recording))
}

/// List all active recordings (reconciled against the process
/// table).
async fn list_recordings(State(state): State<AppState>) -> ApiResult<Json<Vec<RecordingResponse>>> {
    let active = state.recorder.status().await?;
    Ok(Json(active.into_iter().map(Into::into).collect()))
}

/// Report one active recording.
async fn get_recording(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<RecordingResponse>> {
    let record = state.recorder.status_of(&name).await?;
    Ok(Json(record.into()))
}

/// Start a recording.
async fn start_recording(
    State(state): State<AppState>,
    Json(request): Json<StartRecordingRequest>,
) -> ApiResult<(StatusCode, Json<StartRecordingResponse>)> {
    // Defense-in-depth only; the recorder re-checks.
    if request.source_url.trim().is_empty() {
        return Err(ApiError::validation("source_url must not be empty"));
    }
    if request.name.is_empty() || !request.name.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ApiError::validation(
            "name must be non-empty and alphanumeric",
        ));
    }

    let output_path = state
        .recorder
        .start(&request.name, &request.source_url, request.duration_minutes)
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(StartRecordingResponse {
            name: request.name,
            output_path,
        }),
    ))
}

/// Stop one recording.
async fn stop_recording(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<StopRecordingResponse>> {
    let output_path = state.recorder.stop(&name).await?;
    Ok(Json(StopRecordingResponse { output_path }))
}

/// Stop every active recording.
async fn stop_all_recordings(State(state): State<AppState>) -> ApiResult<Json<StopAllResponse>> {
    let stopped = state.recorder.stop_all().await?;
    Ok(Json(StopAllResponse { stopped }))
}
