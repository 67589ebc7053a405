//! Schedule management routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::api::models::{ScheduleRequest, ScheduleResponse, TriggerResponse};
use crate::api::server::AppState;

/// Create the schedules router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_schedules).post(create_schedule))
        .route("/{id}", put(update_schedule).delete(delete_schedule))
        .route("/{id}/trigger", post(trigger_schedule))
}

/// List all schedule definitions.
async fn list_schedules(State(state): State<AppState>) -> Json<Vec<ScheduleResponse>> {
    let definitions = state.scheduler.list().await;
    Json(definitions.into_iter().map(Into::into).collect())
}

/// Create a schedule and arm its trigger.
async fn create_schedule(
    State(state): State<AppState>,
    Json(request): Json<ScheduleRequest>,
) -> ApiResult<(StatusCode, Json<ScheduleResponse>)> {
    let definition = request.into_definition(Uuid::new_v4());
    state.scheduler.add(definition.clone()).await?;
    Ok((StatusCode::CREATED, Json(definition.into())))
}

/// Replace a schedule, re-arming its trigger.
async fn update_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<ScheduleRequest>,
) -> ApiResult<Json<ScheduleResponse>> {
    let definition = request.into_definition(id);
    state.scheduler.update(definition.clone()).await?;
    Ok(Json(definition.into()))
}

/// Disarm and delete a schedule.
async fn delete_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.scheduler.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Fire a schedule now, exactly as its trigger would.
async fn trigger_schedule(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TriggerResponse>> {
    let output_path = state.scheduler.trigger(id).await?;
    Ok(Json(TriggerResponse {
        started: output_path.is_some(),
        output_path,
    }))
}
