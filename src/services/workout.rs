use std::sync::Arc;

use crate::dto::{CreateWorkoutRequest, ListParams, UpdateWorkoutRequest, WorkoutResponse};
use crate::error::ApiError;
use crate::models::{NewWorkout, Ownership};
use crate::query::{Page, WORKOUT_SORT_FIELDS};
use crate::resolver::{resolve_children, ExerciseLookup};
use crate::storage::Store;
use crate::validation::{
    authorize, authorize_mutation, check_title_free, require_default, validate_optional_text,
    validate_text, Variant,
};

use super::workout_response;

#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn Store>,
}

impl WorkoutService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_custom(
        &self,
        acting_user_id: i64,
        req: CreateWorkoutRequest,
    ) -> Result<WorkoutResponse, ApiError> {
        validate_text("title", &req.title)?;
        validate_optional_text("description", req.description.as_deref())?;
        resolve_children(
            &ExerciseLookup(self.store.as_ref()),
            &req.exercise_ids,
            acting_user_id,
            "exercises",
            false,
        )
        .await?;

        let matches = self
            .store
            .find_workouts_by_title(&req.title, Some(acting_user_id))
            .await?;
        check_title_free(&matches, None)?;

        let workout = self
            .store
            .insert_workout(NewWorkout {
                title: req.title,
                description: req.description,
                ownership: Ownership::Custom { owner_id: acting_user_id },
                exercise_ids: req.exercise_ids.into_iter().collect(),
            })
            .await?;
        workout_response(self.store.as_ref(), workout).await
    }

    pub async fn get_custom(
        &self,
        acting_user_id: i64,
        id: i64,
    ) -> Result<WorkoutResponse, ApiError> {
        let workout = self
            .store
            .get_workout(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "workout", id })?;
        authorize(&workout, acting_user_id, Variant::Custom)?;
        workout_response(self.store.as_ref(), workout).await
    }

    pub async fn get_default(&self, id: i64) -> Result<WorkoutResponse, ApiError> {
        let workout = self
            .store
            .get_workout(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "workout", id })?;
        require_default(&workout)?;
        workout_response(self.store.as_ref(), workout).await
    }

    pub async fn list(
        &self,
        acting_user_id: i64,
        params: ListParams,
    ) -> Result<Page<WorkoutResponse>, ApiError> {
        let query = params.into_query(acting_user_id)?.validated(WORKOUT_SORT_FIELDS)?;
        let page = self.store.list_workouts(&query).await?;
        let Page { items, page, size, total_elements, total_pages } = page;
        let mut responses = Vec::with_capacity(items.len());
        for workout in items {
            responses.push(workout_response(self.store.as_ref(), workout).await?);
        }
        Ok(Page { items: responses, page, size, total_elements, total_pages })
    }

    pub async fn update_custom(
        &self,
        acting_user_id: i64,
        id: i64,
        req: UpdateWorkoutRequest,
    ) -> Result<WorkoutResponse, ApiError> {
        let current = self
            .store
            .get_workout(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "workout", id })?;
        authorize_mutation(&current, acting_user_id)?;
        if req.is_empty() {
            return Err(ApiError::EmptyUpdateRequest);
        }

        let mut updated = current.clone();
        if let Some(title) = req.title {
            validate_text("title", &title)?;
            if title == current.title {
                return Err(ApiError::FieldNotDifferent { field: "title" });
            }
            let matches = self
                .store
                .find_workouts_by_title(&title, Some(acting_user_id))
                .await?;
            check_title_free(&matches, Some(id))?;
            updated.title = title;
        }
        if let Some(description) = req.description {
            validate_text("description", &description)?;
            if current.description.as_deref() == Some(description.as_str()) {
                return Err(ApiError::FieldNotDifferent { field: "description" });
            }
            updated.description = Some(description);
        }
        if let Some(ids) = req.exercise_ids {
            resolve_children(
                &ExerciseLookup(self.store.as_ref()),
                &ids,
                acting_user_id,
                "exercises",
                false,
            )
            .await?;
            updated.exercise_ids = ids.into_iter().collect();
        }

        let workout = self.store.update_workout(updated).await?;
        workout_response(self.store.as_ref(), workout).await
    }

    pub async fn delete_custom(&self, acting_user_id: i64, id: i64) -> Result<(), ApiError> {
        let current = self
            .store
            .get_workout(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "workout", id })?;
        authorize_mutation(&current, acting_user_id)?;
        self.store.delete_workout(id).await?;
        Ok(())
    }
}
