use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::{CreateHttpRefRequest, HttpRefResponse, ListParams, UpdateHttpRefRequest};
use crate::error::ApiError;
use crate::middleware::ActingUser;
use crate::query::Page;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/http-refs", get(list).post(create))
        .route("/http-refs/:id", get(get_one).put(update).delete(remove))
        .route("/http-refs/default/:id", get(get_default))
}

async fn create(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<CreateHttpRefRequest>,
) -> Result<(StatusCode, Json<HttpRefResponse>), ApiError> {
    let created = state.http_refs.create_custom(user_id, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<HttpRefResponse>>, ApiError> {
    Ok(Json(state.http_refs.list(user_id, params).await?))
}

async fn get_one(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
) -> Result<Json<HttpRefResponse>, ApiError> {
    Ok(Json(state.http_refs.get_custom(user_id, id).await?))
}

async fn get_default(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<HttpRefResponse>, ApiError> {
    Ok(Json(state.http_refs.get_default(id).await?))
}

async fn update(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateHttpRefRequest>,
) -> Result<Json<HttpRefResponse>, ApiError> {
    Ok(Json(state.http_refs.update_custom(user_id, id, req).await?))
}

async fn remove(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.http_refs.delete_custom(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
