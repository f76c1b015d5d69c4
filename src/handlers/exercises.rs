use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::{CreateExerciseRequest, ExerciseResponse, ListParams, UpdateExerciseRequest};
use crate::error::ApiError;
use crate::middleware::ActingUser;
use crate::query::Page;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/exercises", get(list).post(create))
        .route("/exercises/:id", get(get_one).put(update).delete(remove))
        .route("/exercises/default/:id", get(get_default))
}

async fn create(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<CreateExerciseRequest>,
) -> Result<(StatusCode, Json<ExerciseResponse>), ApiError> {
    let created = state.exercises.create_custom(user_id, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<ExerciseResponse>>, ApiError> {
    Ok(Json(state.exercises.list(user_id, params).await?))
}

async fn get_one(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    Ok(Json(state.exercises.get_custom(user_id, id).await?))
}

// Default rows are world-readable, so no user header here.
async fn get_default(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    Ok(Json(state.exercises.get_default(id).await?))
}

async fn update(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateExerciseRequest>,
) -> Result<Json<ExerciseResponse>, ApiError> {
    Ok(Json(state.exercises.update_custom(user_id, id, req).await?))
}

async fn remove(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.exercises.delete_custom(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
