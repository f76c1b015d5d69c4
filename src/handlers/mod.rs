//! HTTP surface. Handlers translate between the wire and the services and
//! contain no business rules of their own.

pub mod exercises;
pub mod http_refs;
pub mod mental_activities;
pub mod mental_workouts;
pub mod workouts;

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::config;
use crate::dto::{BodyPartResponse, MentalTypeResponse};
use crate::error::ApiError;
use crate::middleware::ActingUser;
use crate::services::{
    ExerciseService, HttpRefService, MentalActivityService, MentalWorkoutService, WorkoutService,
};
use crate::storage::Store;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub exercises: ExerciseService,
    pub workouts: WorkoutService,
    pub http_refs: HttpRefService,
    pub mental_activities: MentalActivityService,
    pub mental_workouts: MentalWorkoutService,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            exercises: ExerciseService::new(store.clone()),
            workouts: WorkoutService::new(store.clone()),
            http_refs: HttpRefService::new(store.clone()),
            mental_activities: MentalActivityService::new(store.clone()),
            mental_workouts: MentalWorkoutService::new(store.clone()),
            store,
        }
    }
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(exercises::routes())
        .merge(workouts::routes())
        .merge(http_refs::routes())
        .merge(mental_activities::routes())
        .merge(mental_workouts::routes())
        .route("/body-parts", get(list_body_parts))
        .route("/mental-types", get(list_mental_types));

    let mut router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http());
    if config::config().api.enable_cors {
        router = router.layer(CorsLayer::permissive());
    }
    router
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "healthy" }))
}

async fn list_body_parts(
    State(state): State<AppState>,
    _user: ActingUser,
) -> Result<Json<Vec<BodyPartResponse>>, ApiError> {
    let parts = state.store.list_body_parts().await?;
    Ok(Json(parts.into_iter().map(BodyPartResponse::from).collect()))
}

async fn list_mental_types(
    State(state): State<AppState>,
    _user: ActingUser,
) -> Result<Json<Vec<MentalTypeResponse>>, ApiError> {
    let types = state.store.list_mental_types().await?;
    Ok(Json(types.into_iter().map(MentalTypeResponse::from).collect()))
}
