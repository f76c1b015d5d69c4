use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use crate::dto::{
    CreateMentalActivityRequest, ListParams, MentalActivityResponse, UpdateMentalActivityRequest,
};
use crate::error::ApiError;
use crate::middleware::ActingUser;
use crate::query::Page;

use super::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/mental-activities", get(list).post(create))
        .route(
            "/mental-activities/:id",
            get(get_one).put(update).delete(remove),
        )
        .route("/mental-activities/default/:id", get(get_default))
}

async fn create(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Json(req): Json<CreateMentalActivityRequest>,
) -> Result<(StatusCode, Json<MentalActivityResponse>), ApiError> {
    let created = state.mental_activities.create_custom(user_id, req).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn list(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Query(params): Query<ListParams>,
) -> Result<Json<Page<MentalActivityResponse>>, ApiError> {
    Ok(Json(state.mental_activities.list(user_id, params).await?))
}

async fn get_one(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
) -> Result<Json<MentalActivityResponse>, ApiError> {
    Ok(Json(state.mental_activities.get_custom(user_id, id).await?))
}

async fn get_default(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MentalActivityResponse>, ApiError> {
    Ok(Json(state.mental_activities.get_default(id).await?))
}

async fn update(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
    Json(req): Json<UpdateMentalActivityRequest>,
) -> Result<Json<MentalActivityResponse>, ApiError> {
    Ok(Json(
        state.mental_activities.update_custom(user_id, id, req).await?,
    ))
}

async fn remove(
    State(state): State<AppState>,
    ActingUser(user_id): ActingUser,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    state.mental_activities.delete_custom(user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
