use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::{CreateWorkoutRequest, ListParams, UpdateWorkoutRequest, WorkoutResponse};
use crate::error::ApiError;
use crate::middleware::ActingUser;
use crate::query::Page;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/workouts", get(list).post(create))
        .route("/workouts/:id", get(get_one).put(update).delete(remove))
        .route("/workouts/default/:id", get(get_default))
}

async fn create(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<CreateWorkoutRequest>,
) -> Result<(StatusCode, Json<WorkoutResponse>), ApiError> {
    let created = state.workouts.create_custom(user_id, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<WorkoutResponse>>, ApiError> {
    Ok(Json(state.workouts.list(user_id, params).await?))
}

async fn get_one(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
) -> Result<Json<WorkoutResponse>, ApiError> {
    Ok(Json(state.workouts.get_custom(user_id, id).await?))
}

async fn get_default(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<WorkoutResponse>, ApiError> {
    Ok(Json(state.workouts.get_default(id).await?))
}

async fn update(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateWorkoutRequest>,
) -> Result<Json<WorkoutResponse>, ApiError> {
    Ok(Json(state.workouts.update_custom(user_id, id, req).await?))
}

async fn remove(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.workouts.delete_custom(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
