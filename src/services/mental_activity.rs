use std::sync::Arc;

use crate::dto::{
    CreateMentalActivityRequest, ListParams, MentalActivityResponse, UpdateMentalActivityRequest,
};
use crate::error::ApiError;
use crate::models::{NewMentalActivity, Ownership};
use crate::query::{Page, MENTAL_ACTIVITY_SORT_FIELDS};
use crate::resolver::{resolve_children, HttpRefLookup, MentalTypeLookup};
use crate::storage::Store;
use crate::validation::{
    authorize, authorize_mutation, check_title_free, require_default, validate_optional_text,
    validate_text, Variant,
};

use super::mental_activity_response;

#[derive(Clone)]
pub struct MentalActivityService {
    store: Arc<dyn Store>,
}

impl MentalActivityService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_custom(
        &self,
        acting_user_id: i64,
        req: CreateMentalActivityRequest,
    ) -> Result<MentalActivityResponse, ApiError> {
        validate_text("title", &req.title)?;
        validate_optional_text("description", req.description.as_deref())?;
        resolve_children(
            &MentalTypeLookup(self.store.as_ref()),
            &[req.mental_type_id],
            acting_user_id,
            "mentalType",
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
            .find_mental_activities_by_title(&req.title, Some(acting_user_id))
            .await?;
        check_title_free(&matches, None)?;

        let activity = self
            .store
            .insert_mental_activity(NewMentalActivity {
                title: req.title,
                description: req.description,
                mental_type_id: req.mental_type_id,
                ownership: Ownership::Custom { owner_id: acting_user_id },
                http_ref_ids: req.http_ref_ids.into_iter().collect(),
            })
            .await?;
        mental_activity_response(self.store.as_ref(), activity).await
    }

    pub async fn get_custom(
        &self,
        acting_user_id: i64,
        id: i64,
    ) -> Result<MentalActivityResponse, ApiError> {
        let activity = self
            .store
            .get_mental_activity(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "mentalActivity", id })?;
        authorize(&activity, acting_user_id, Variant::Custom)?;
        mental_activity_response(self.store.as_ref(), activity).await
    }

    pub async fn get_default(&self, id: i64) -> Result<MentalActivityResponse, ApiError> {
        let activity = self
            .store
            .get_mental_activity(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "mentalActivity", id })?;
        require_default(&activity)?;
        mental_activity_response(self.store.as_ref(), activity).await
    }

    pub async fn list(
        &self,
        acting_user_id: i64,
        params: ListParams,
    ) -> Result<Page<MentalActivityResponse>, ApiError> {
        let query = params
            .into_query(acting_user_id)?
            .validated(MENTAL_ACTIVITY_SORT_FIELDS)?;
        let page = self.store.list_mental_activities(&query).await?;
        let Page { items, page, size, total_elements, total_pages } = page;
        let mut responses = Vec::with_capacity(items.len());
        for activity in items {
            responses.push(mental_activity_response(self.store.as_ref(), activity).await?);
        }
        Ok(Page { items: responses, page, size, total_elements, total_pages })
    }

    pub async fn update_custom(
        &self,
        acting_user_id: i64,
        id: i64,
        req: UpdateMentalActivityRequest,
    ) -> Result<MentalActivityResponse, ApiError> {
        let current = self
            .store
            .get_mental_activity(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "mentalActivity", id })?;
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
                .find_mental_activities_by_title(&title, Some(acting_user_id))
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
        if let Some(mental_type_id) = req.mental_type_id {
            if mental_type_id == current.mental_type_id {
                return Err(ApiError::FieldNotDifferent { field: "mentalTypeId" });
            }
            self.store
                .get_mental_type(mental_type_id)
                .await?
                .ok_or(ApiError::ChildNotFound { id: mental_type_id })?;
            updated.mental_type_id = mental_type_id;
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

        let activity = self.store.update_mental_activity(updated).await?;
        mental_activity_response(self.store.as_ref(), activity).await
    }

    pub async fn delete_custom(&self, acting_user_id: i64, id: i64) -> Result<(), ApiError> {
        let current = self
            .store
            .get_mental_activity(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "mentalActivity", id })?;
        authorize_mutation(&current, acting_user_id)?;
        self.store.delete_mental_activity(id).await?;
        Ok(())
    }
}
