use std::sync::Arc;

use crate::dto::{
    CreateMentalWorkoutRequest, ListParams, MentalWorkoutResponse, UpdateMentalWorkoutRequest,
};
use crate::error::ApiError;
use crate::models::{NewMentalWorkout, Ownership};
use crate::query::{Page, MENTAL_WORKOUT_SORT_FIELDS};
use crate::resolver::{resolve_children, MentalActivityLookup};
use crate::storage::Store;
use crate::validation::{
    authorize, authorize_mutation, check_title_free, require_default, validate_optional_text,
    validate_text, Variant,
};

use super::mental_workout_response;

#[derive(Clone)]
pub struct MentalWorkoutService {
    store: Arc<dyn Store>,
}

impl MentalWorkoutService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_custom(
        &self,
        acting_user_id: i64,
        req: CreateMentalWorkoutRequest,
    ) -> Result<MentalWorkoutResponse, ApiError> {
        validate_text("title", &req.title)?;
        validate_optional_text("description", req.description.as_deref())?;
        resolve_children(
            &MentalActivityLookup(self.store.as_ref()),
            &req.mental_activity_ids,
            acting_user_id,
            "mentalActivities",
            false,
        )
        .await?;

        let matches = self
            .store
            .find_mental_workouts_by_title(&req.title, Some(acting_user_id))
            .await?;
        check_title_free(&matches, None)?;

        let workout = self
            .store
            .insert_mental_workout(NewMentalWorkout {
                title: req.title,
                description: req.description,
                ownership: Ownership::Custom { owner_id: acting_user_id },
                mental_activity_ids: req.mental_activity_ids.into_iter().collect(),
            })
            .await?;
        mental_workout_response(self.store.as_ref(), workout).await
    }

    pub async fn get_custom(
        &self,
        acting_user_id: i64,
        id: i64,
    ) -> Result<MentalWorkoutResponse, ApiError> {
        let workout = self
            .store
            .get_mental_workout(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "mentalWorkout", id })?;
        authorize(&workout, acting_user_id, Variant::Custom)?;
        mental_workout_response(self.store.as_ref(), workout).await
    }

    pub async fn get_default(&self, id: i64) -> Result<MentalWorkoutResponse, ApiError> {
        let workout = self
            .store
            .get_mental_workout(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "mentalWorkout", id })?;
        require_default(&workout)?;
        mental_workout_response(self.store.as_ref(), workout).await
    }

    pub async fn list(
        &self,
        acting_user_id: i64,
        params: ListParams,
    ) -> Result<Page<MentalWorkoutResponse>, ApiError> {
        let query = params
            .into_query(acting_user_id)?
            .validated(MENTAL_WORKOUT_SORT_FIELDS)?;
        let page = self.store.list_mental_workouts(&query).await?;
        let Page { items, page, size, total_elements, total_pages } = page;
        let mut responses = Vec::with_capacity(items.len());
        for workout in items {
            responses.push(mental_workout_response(self.store.as_ref(), workout).await?);
        }
        Ok(Page { items: responses, page, size, total_elements, total_pages })
    }

    pub async fn update_custom(
        &self,
        acting_user_id: i64,
        id: i64,
        req: UpdateMentalWorkoutRequest,
    ) -> Result<MentalWorkoutResponse, ApiError> {
        let current = self
            .store
            .get_mental_workout(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "mentalWorkout", id })?;
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
                .find_mental_workouts_by_title(&title, Some(acting_user_id))
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
        if let Some(ids) = req.mental_activity_ids {
            resolve_children(
                &MentalActivityLookup(self.store.as_ref()),
                &ids,
                acting_user_id,
                "mentalActivities",
                false,
            )
            .await?;
            updated.mental_activity_ids = ids.into_iter().collect();
        }

        let workout = self.store.update_mental_workout(updated).await?;
        mental_workout_response(self.store.as_ref(), workout).await
    }

    pub async fn delete_custom(&self, acting_user_id: i64, id: i64) -> Result<(), ApiError> {
        let current = self
            .store
            .get_mental_workout(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "mentalWorkout", id })?;
        authorize_mutation(&current, acting_user_id)?;
        self.store.delete_mental_workout(id).await?;
        Ok(())
    }
}
