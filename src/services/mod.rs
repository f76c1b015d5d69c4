//! Business rules live here: ownership checks, duplicate-title policy, the
//! partial-update machine and derived-attribute recomputation. Handlers stay
//! thin; services see storage only through the [`Store`] trait.

pub mod exercise;
pub mod http_ref;
pub mod mental_activity;
pub mod mental_workout;
pub mod workout;

pub use exercise::ExerciseService;
pub use http_ref::HttpRefService;
pub use mental_activity::MentalActivityService;
pub use mental_workout::MentalWorkoutService;
pub use workout::WorkoutService;

use crate::aggregate::aggregate;
use crate::dto::{ExerciseResponse, MentalActivityResponse, MentalWorkoutResponse, WorkoutResponse};
use crate::error::ApiError;
use crate::models::{Exercise, MentalActivity, MentalWorkout, Workout};
use crate::storage::{Store, StoreError};

fn ids_of(set: &std::collections::BTreeSet<i64>) -> Vec<i64> {
    set.iter().copied().collect()
}

pub(crate) async fn exercise_response(
    store: &dyn Store,
    exercise: Exercise,
) -> Result<ExerciseResponse, ApiError> {
    let body_parts = store.body_parts_by_ids(&ids_of(&exercise.body_part_ids)).await?;
    let http_refs = store.http_refs_by_ids(&ids_of(&exercise.http_ref_ids)).await?;
    Ok(ExerciseResponse::from_parts(exercise, body_parts, http_refs))
}

/// Derived attributes are recomputed from the live child set on every
/// response; nothing about them is read back from storage.
pub(crate) async fn workout_response(
    store: &dyn Store,
    workout: Workout,
) -> Result<WorkoutResponse, ApiError> {
    let exercises = store.exercises_by_ids(&ids_of(&workout.exercise_ids)).await?;
    let derived = aggregate(&exercises);
    let body_parts = store.body_parts_by_ids(&derived.body_part_ids).await?;
    let mut children = Vec::with_capacity(exercises.len());
    for exercise in exercises {
        children.push(exercise_response(store, exercise).await?);
    }
    Ok(WorkoutResponse::from_parts(workout, derived, body_parts, children))
}

pub(crate) async fn mental_activity_response(
    store: &dyn Store,
    activity: MentalActivity,
) -> Result<MentalActivityResponse, ApiError> {
    let mental_type = store
        .get_mental_type(activity.mental_type_id)
        .await?
        .ok_or(StoreError::NotFound)?;
    let http_refs = store.http_refs_by_ids(&ids_of(&activity.http_ref_ids)).await?;
    Ok(MentalActivityResponse::from_parts(activity, mental_type, http_refs))
}

pub(crate) async fn mental_workout_response(
    store: &dyn Store,
    workout: MentalWorkout,
) -> Result<MentalWorkoutResponse, ApiError> {
    let activities = store
        .mental_activities_by_ids(&ids_of(&workout.mental_activity_ids))
        .await?;
    let mut children = Vec::with_capacity(activities.len());
    for activity in activities {
        children.push(mental_activity_response(store, activity).await?);
    }
    Ok(MentalWorkoutResponse::from_parts(workout, children))
}
