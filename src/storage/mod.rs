//! Persistence boundary. Services talk to [`Store`] only; the concrete
//! engine behind it (in-memory arena or Postgres) is interchangeable.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{
    BodyPart, Exercise, HttpRef, MentalActivity, MentalType, MentalWorkout, NewExercise,
    NewHttpRef, NewMentalActivity, NewMentalWorkout, NewWorkout, User, Workout,
};
use crate::query::{Page, ResourceQuery};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("record not found")]
    NotFound,

    #[error("storage backend error: {0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            other => StoreError::Backend(other.to_string()),
        }
    }
}

/// Finder/mutation surface the services orchestrate.
///
/// Conventions:
/// - `find_*_by_title` returns default rows with that exact title plus the
///   given owner's custom rows with it (the duplicate-title scope).
/// - `*_by_ids` returns only the rows that exist, ascending by id.
/// - `update_*` replaces the stored row (associations wholesale) and bumps
///   `updated_at`; a missing id is `StoreError::NotFound`.
/// - `delete_*` detaches the row from every parent that references it before
///   removing it; children are never touched.
/// - `list_*` executes an already-validated [`ResourceQuery`]; for resources
///   with a child-id filter the relevant set is noted per method.
#[async_trait]
pub trait Store: Send + Sync {
    // Users (owners only; account lifecycle is out of scope)
    async fn insert_user(&self, username: &str, email: &str) -> Result<User, StoreError>;
    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError>;

    // Body parts (seeded lookup)
    async fn insert_body_part(&self, name: &str) -> Result<BodyPart, StoreError>;
    async fn get_body_part(&self, id: i64) -> Result<Option<BodyPart>, StoreError>;
    async fn body_parts_by_ids(&self, ids: &[i64]) -> Result<Vec<BodyPart>, StoreError>;
    async fn list_body_parts(&self) -> Result<Vec<BodyPart>, StoreError>;

    // Mental types (seeded lookup)
    async fn insert_mental_type(&self, name: &str) -> Result<MentalType, StoreError>;
    async fn get_mental_type(&self, id: i64) -> Result<Option<MentalType>, StoreError>;
    async fn list_mental_types(&self) -> Result<Vec<MentalType>, StoreError>;

    // Http refs
    async fn insert_http_ref(&self, new: NewHttpRef) -> Result<HttpRef, StoreError>;
    async fn get_http_ref(&self, id: i64) -> Result<Option<HttpRef>, StoreError>;
    async fn http_refs_by_ids(&self, ids: &[i64]) -> Result<Vec<HttpRef>, StoreError>;
    async fn find_http_refs_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<HttpRef>, StoreError>;
    async fn update_http_ref(&self, row: HttpRef) -> Result<HttpRef, StoreError>;
    async fn delete_http_ref(&self, id: i64) -> Result<(), StoreError>;
    async fn list_http_refs(&self, query: &ResourceQuery) -> Result<Page<HttpRef>, StoreError>;

    // Exercises (list child filter: body-part ids)
    async fn insert_exercise(&self, new: NewExercise) -> Result<Exercise, StoreError>;
    async fn get_exercise(&self, id: i64) -> Result<Option<Exercise>, StoreError>;
    async fn exercises_by_ids(&self, ids: &[i64]) -> Result<Vec<Exercise>, StoreError>;
    async fn find_exercises_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<Exercise>, StoreError>;
    async fn update_exercise(&self, row: Exercise) -> Result<Exercise, StoreError>;
    async fn delete_exercise(&self, id: i64) -> Result<(), StoreError>;
    async fn list_exercises(&self, query: &ResourceQuery) -> Result<Page<Exercise>, StoreError>;

    // Workouts (list child filter: exercise ids)
    async fn insert_workout(&self, new: NewWorkout) -> Result<Workout, StoreError>;
    async fn get_workout(&self, id: i64) -> Result<Option<Workout>, StoreError>;
    async fn find_workouts_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<Workout>, StoreError>;
    async fn update_workout(&self, row: Workout) -> Result<Workout, StoreError>;
    async fn delete_workout(&self, id: i64) -> Result<(), StoreError>;
    async fn list_workouts(&self, query: &ResourceQuery) -> Result<Page<Workout>, StoreError>;

    // Mental activities (list child filter: http-ref ids)
    async fn insert_mental_activity(
        &self,
        new: NewMentalActivity,
    ) -> Result<MentalActivity, StoreError>;
    async fn get_mental_activity(&self, id: i64) -> Result<Option<MentalActivity>, StoreError>;
    async fn mental_activities_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<MentalActivity>, StoreError>;
    async fn find_mental_activities_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<MentalActivity>, StoreError>;
    async fn update_mental_activity(
        &self,
        row: MentalActivity,
    ) -> Result<MentalActivity, StoreError>;
    async fn delete_mental_activity(&self, id: i64) -> Result<(), StoreError>;
    async fn list_mental_activities(
        &self,
        query: &ResourceQuery,
    ) -> Result<Page<MentalActivity>, StoreError>;

    // Mental workouts (list child filter: mental-activity ids)
    async fn insert_mental_workout(
        &self,
        new: NewMentalWorkout,
    ) -> Result<MentalWorkout, StoreError>;
    async fn get_mental_workout(&self, id: i64) -> Result<Option<MentalWorkout>, StoreError>;
    async fn find_mental_workouts_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<MentalWorkout>, StoreError>;
    async fn update_mental_workout(
        &self,
        row: MentalWorkout,
    ) -> Result<MentalWorkout, StoreError>;
    async fn delete_mental_workout(&self, id: i64) -> Result<(), StoreError>;
    async fn list_mental_workouts(
        &self,
        query: &ResourceQuery,
    ) -> Result<Page<MentalWorkout>, StoreError>;
}
