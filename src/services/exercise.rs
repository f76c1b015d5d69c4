use std::sync::Arc;

use crate::dto::{CreateExerciseRequest, ExerciseResponse, ListParams, UpdateExerciseRequest};
use crate::error::ApiError;
use crate::models::{NewExercise, Ownership};
use crate::query::{Page, ResourceQuery, EXERCISE_SORT_FIELDS};
use crate::resolver::{resolve_children, BodyPartLookup, HttpRefLookup};
use crate::storage::Store;
use crate::validation::{
    authorize, authorize_mutation, check_title_free, require_default, validate_optional_text,
    validate_text, Variant,
};

use super::exercise_response;

#[derive(Clone)]
pub struct ExerciseService {
    store: Arc<dyn Store>,
}

impl ExerciseService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_custom(
        &self,
        acting_user_id: i64,
        req: CreateExerciseRequest,
    ) -> Result<ExerciseResponse, ApiError> {
        validate_text("title", &req.title)?;
        validate_optional_text("description", req.description.as_deref())?;
        resolve_children(
            &BodyPartLookup(self.store.as_ref()),
            &req.body_part_ids,
            acting_user_id,
            "bodyParts",
            true,
        )
        .await?;
        resolve_children(
            &HttpRefLookup(self.store.as_ref()),
            &req.http_ref_ids,
            acting_user_id,
            "httpRefs",
            false,
        )
        .await?;

        let matches = self
            .store
            .find_exercises_by_title(&req.title, Some(acting_user_id))
            .await?;
        check_title_free(&matches, None)?;

        let exercise = self
            .store
            .insert_exercise(NewExercise {
                title: req.title,
                description: req.description,
                needs_equipment: req.needs_equipment,
                ownership: Ownership::Custom { owner_id: acting_user_id },
                body_part_ids: req.body_part_ids.into_iter().collect(),
                http_ref_ids: req.http_ref_ids.into_iter().collect(),
            })
            .await?;
        exercise_response(self.store.as_ref(), exercise).await
    }

    pub async fn get_custom(
        &self,
        acting_user_id: i64,
        id: i64,
    ) -> Result<ExerciseResponse, ApiError> {
        let exercise = self
            .store
            .get_exercise(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "exercise", id })?;
        authorize(&exercise, acting_user_id, Variant::Custom)?;
        exercise_response(self.store.as_ref(), exercise).await
    }

    /// Default rows are world-readable; no acting user involved.
    pub async fn get_default(&self, id: i64) -> Result<ExerciseResponse, ApiError> {
        let exercise = self
            .store
            .get_exercise(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "exercise", id })?;
        require_default(&exercise)?;
        exercise_response(self.store.as_ref(), exercise).await
    }

    pub async fn list(
        &self,
        acting_user_id: i64,
        params: ListParams,
    ) -> Result<Page<ExerciseResponse>, ApiError> {
        let query: ResourceQuery =
            params.into_query(acting_user_id)?.validated(EXERCISE_SORT_FIELDS)?;
        let page = self.store.list_exercises(&query).await?;
        let Page { items, page, size, total_elements, total_pages } = page;
        let mut responses = Vec::with_capacity(items.len());
        for exercise in items {
            responses.push(exercise_response(self.store.as_ref(), exercise).await?);
        }
        Ok(Page { items: responses, page, size, total_elements, total_pages })
    }

    /// Partial update. Scalars present in the request must differ from the
    /// stored value; child-id sets present in the request replace the stored
    /// set wholesale.
    pub async fn update_custom(
        &self,
        acting_user_id: i64,
        id: i64,
        req: UpdateExerciseRequest,
    ) -> Result<ExerciseResponse, ApiError> {
        let current = self
            .store
            .get_exercise(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "exercise", id })?;
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
                .find_exercises_by_title(&title, Some(acting_user_id))
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
        if let Some(needs_equipment) = req.needs_equipment {
            if needs_equipment == current.needs_equipment {
                return Err(ApiError::FieldNotDifferent { field: "needsEquipment" });
            }
            updated.needs_equipment = needs_equipment;
        }
        if let Some(ids) = req.body_part_ids {
            resolve_children(
                &BodyPartLookup(self.store.as_ref()),
                &ids,
                acting_user_id,
                "bodyParts",
                true,
            )
            .await?;
            updated.body_part_ids = ids.into_iter().collect();
        }
        if let Some(ids) = req.http_ref_ids {
            resolve_children(
                &HttpRefLookup(self.store.as_ref()),
                &ids,
                acting_user_id,
                "httpRefs",
                false,
            )
            .await?;
            updated.http_ref_ids = ids.into_iter().collect();
        }

        let exercise = self.store.update_exercise(updated).await?;
        exercise_response(self.store.as_ref(), exercise).await
    }

    pub async fn delete_custom(&self, acting_user_id: i64, id: i64) -> Result<(), ApiError> {
        let current = self
            .store
            .get_exercise(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "exercise", id })?;
        authorize_mutation(&current, acting_user_id)?;
        self.store.delete_exercise(id).await?;
        Ok(())
    }
}
