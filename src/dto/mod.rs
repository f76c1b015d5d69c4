//! Wire types. Requests deserialize camelCase JSON; responses embed fully
//! resolved child objects, ascending by id. Mapping to and from the domain
//! models is explicit so the wire shape can drift without touching storage.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::WorkoutDerived;
use crate::error::ApiError;
use crate::models::{
    BodyPart, Exercise, HttpRef, MentalActivity, MentalType, MentalWorkout, Workout,
};
use crate::query::{ResourceQuery, SortDirection, VisibilityScope};

// ---------------------------------------------------------------------------
// Listing parameters

/// Query-string side of a listing. `childIds` is a comma-separated id list;
/// the per-resource aliases let clients use the natural association name.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub scope: Option<VisibilityScope>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub needs_equipment: Option<bool>,
    #[serde(
        alias = "bodyPartIds",
        alias = "exerciseIds",
        alias = "httpRefIds",
        alias = "mentalActivityIds"
    )]
    pub child_ids: Option<String>,
    pub sort_field: Option<String>,
    pub sort_direction: Option<SortDirection>,
    pub page: Option<u32>,
    pub size: Option<u32>,
}

impl ListParams {
    /// Build the (not yet validated) query for the acting user. Scope
    /// defaults to the union of default rows and the user's own customs;
    /// `scope=default` drops the owner so the result carries no user data.
    pub fn into_query(self, acting_user_id: i64) -> Result<ResourceQuery, ApiError> {
        let scope = self.scope.unwrap_or(VisibilityScope::Both);
        let owner_id = match scope {
            VisibilityScope::Default => None,
            VisibilityScope::Custom | VisibilityScope::Both => Some(acting_user_id),
        };
        let mut query = ResourceQuery::new(scope, owner_id);
        query.title = self.title;
        query.description = self.description;
        query.needs_equipment = self.needs_equipment;
        // An empty value (`?bodyPartIds=`) means no filter, not "match none".
        query.child_ids = self
            .child_ids
            .as_deref()
            .map(parse_id_list)
            .transpose()?
            .filter(|ids| !ids.is_empty());
        query.sort_field = self.sort_field;
        query.sort_direction = self.sort_direction.unwrap_or_default();
        query.page = self.page.unwrap_or(0);
        if let Some(size) = self.size {
            query.size = size;
        }
        Ok(query)
    }
}

fn parse_id_list(raw: &str) -> Result<Vec<i64>, ApiError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>()
                .map_err(|_| ApiError::invalid_field("childIds", format!("'{}' is not an id", s)))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Exercises

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExerciseRequest {
    pub title: String,
    pub description: Option<String>,
    pub needs_equipment: bool,
    #[serde(default)]
    pub body_part_ids: Vec<i64>,
    #[serde(default)]
    pub http_ref_ids: Vec<i64>,
}

/// All fields optional; an entirely absent body is rejected. Present child
/// sets replace the stored set wholesale.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExerciseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub needs_equipment: Option<bool>,
    pub body_part_ids: Option<Vec<i64>>,
    pub http_ref_ids: Option<Vec<i64>>,
}

impl UpdateExerciseRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.needs_equipment.is_none()
            && self.body_part_ids.is_none()
            && self.http_ref_ids.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub needs_equipment: bool,
    pub is_custom: bool,
    pub body_parts: Vec<BodyPartResponse>,
    pub http_refs: Vec<HttpRefResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExerciseResponse {
    /// `body_parts` and `http_refs` must already be ascending by id.
    pub fn from_parts(
        exercise: Exercise,
        body_parts: Vec<BodyPart>,
        http_refs: Vec<HttpRef>,
    ) -> Self {
        Self {
            id: exercise.id,
            title: exercise.title,
            description: exercise.description,
            needs_equipment: exercise.needs_equipment,
            is_custom: exercise.ownership.is_custom(),
            body_parts: body_parts.into_iter().map(BodyPartResponse::from).collect(),
            http_refs: http_refs.into_iter().map(HttpRefResponse::from).collect(),
            created_at: exercise.created_at,
            updated_at: exercise.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Workouts

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateWorkoutRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub exercise_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateWorkoutRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub exercise_ids: Option<Vec<i64>>,
}

impl UpdateWorkoutRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.exercise_ids.is_none()
    }
}

/// `body_parts` and `needs_equipment` are the derived attributes, recomputed
/// from the attached exercises for every response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_custom: bool,
    pub needs_equipment: bool,
    pub body_parts: Vec<BodyPartResponse>,
    pub exercises: Vec<ExerciseResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorkoutResponse {
    pub fn from_parts(
        workout: Workout,
        derived: WorkoutDerived,
        body_parts: Vec<BodyPart>,
        exercises: Vec<ExerciseResponse>,
    ) -> Self {
        Self {
            id: workout.id,
            title: workout.title,
            description: workout.description,
            is_custom: workout.ownership.is_custom(),
            needs_equipment: derived.needs_equipment,
            body_parts: body_parts.into_iter().map(BodyPartResponse::from).collect(),
            exercises,
            created_at: workout.created_at,
            updated_at: workout.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Http refs

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHttpRefRequest {
    pub name: String,
    #[serde(rename = "ref")]
    pub url: String,
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHttpRefRequest {
    pub name: Option<String>,
    #[serde(rename = "ref")]
    pub url: Option<String>,
    pub description: Option<String>,
}

impl UpdateHttpRefRequest {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.url.is_none() && self.description.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpRefResponse {
    pub id: i64,
    pub name: String,
    #[serde(rename = "ref")]
    pub url: String,
    pub description: Option<String>,
    pub is_custom: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<HttpRef> for HttpRefResponse {
    fn from(http_ref: HttpRef) -> Self {
        Self {
            id: http_ref.id,
            name: http_ref.name,
            url: http_ref.url,
            description: http_ref.description,
            is_custom: http_ref.ownership.is_custom(),
            created_at: http_ref.created_at,
            updated_at: http_ref.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Mental activities and workouts

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMentalActivityRequest {
    pub title: String,
    pub description: Option<String>,
    pub mental_type_id: i64,
    #[serde(default)]
    pub http_ref_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMentalActivityRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub mental_type_id: Option<i64>,
    pub http_ref_ids: Option<Vec<i64>>,
}

impl UpdateMentalActivityRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.mental_type_id.is_none()
            && self.http_ref_ids.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentalActivityResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub mental_type: MentalTypeResponse,
    pub is_custom: bool,
    pub http_refs: Vec<HttpRefResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MentalActivityResponse {
    pub fn from_parts(
        activity: MentalActivity,
        mental_type: MentalType,
        http_refs: Vec<HttpRef>,
    ) -> Self {
        Self {
            id: activity.id,
            title: activity.title,
            description: activity.description,
            mental_type: mental_type.into(),
            is_custom: activity.ownership.is_custom(),
            http_refs: http_refs.into_iter().map(HttpRefResponse::from).collect(),
            created_at: activity.created_at,
            updated_at: activity.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMentalWorkoutRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub mental_activity_ids: Vec<i64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMentalWorkoutRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub mental_activity_ids: Option<Vec<i64>>,
}

impl UpdateMentalWorkoutRequest {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.mental_activity_ids.is_none()
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentalWorkoutResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub is_custom: bool,
    pub mental_activities: Vec<MentalActivityResponse>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl MentalWorkoutResponse {
    pub fn from_parts(
        workout: MentalWorkout,
        mental_activities: Vec<MentalActivityResponse>,
    ) -> Self {
        Self {
            id: workout.id,
            title: workout.title,
            description: workout.description,
            is_custom: workout.ownership.is_custom(),
            mental_activities,
            created_at: workout.created_at,
            updated_at: workout.updated_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Lookups

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BodyPartResponse {
    pub id: i64,
    pub name: String,
}

impl From<BodyPart> for BodyPartResponse {
    fn from(part: BodyPart) -> Self {
        Self { id: part.id, name: part.name }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MentalTypeResponse {
    pub id: i64,
    pub name: String,
}

impl From<MentalType> for MentalTypeResponse {
    fn from(mental_type: MentalType) -> Self {
        Self { id: mental_type.id, name: mental_type.name }
    }
}
