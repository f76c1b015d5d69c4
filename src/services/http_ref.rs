use std::sync::Arc;

use crate::dto::{CreateHttpRefRequest, HttpRefResponse, ListParams, UpdateHttpRefRequest};
use crate::error::ApiError;
use crate::models::{NewHttpRef, Ownership};
use crate::query::{Page, HTTP_REF_SORT_FIELDS};
use crate::storage::Store;
use crate::validation::{
    authorize, authorize_mutation, check_title_free, require_default, validate_optional_text,
    validate_text, validate_url_field, Variant,
};

/// Media references. The duplicate policy keys on `name`, scoped the same
/// way as titles elsewhere.
#[derive(Clone)]
pub struct HttpRefService {
    store: Arc<dyn Store>,
}

impl HttpRefService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create_custom(
        &self,
        acting_user_id: i64,
        req: CreateHttpRefRequest,
    ) -> Result<HttpRefResponse, ApiError> {
        validate_text("name", &req.name)?;
        validate_url_field("ref", &req.url)?;
        validate_optional_text("description", req.description.as_deref())?;

        let matches = self
            .store
            .find_http_refs_by_title(&req.name, Some(acting_user_id))
            .await?;
        check_title_free(&matches, None)?;

        let http_ref = self
            .store
            .insert_http_ref(NewHttpRef {
                name: req.name,
                url: req.url,
                description: req.description,
                ownership: Ownership::Custom { owner_id: acting_user_id },
            })
            .await?;
        Ok(http_ref.into())
    }

    pub async fn get_custom(
        &self,
        acting_user_id: i64,
        id: i64,
    ) -> Result<HttpRefResponse, ApiError> {
        let http_ref = self
            .store
            .get_http_ref(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "httpRef", id })?;
        authorize(&http_ref, acting_user_id, Variant::Custom)?;
        Ok(http_ref.into())
    }

    pub async fn get_default(&self, id: i64) -> Result<HttpRefResponse, ApiError> {
        let http_ref = self
            .store
            .get_http_ref(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "httpRef", id })?;
        require_default(&http_ref)?;
        Ok(http_ref.into())
    }

    pub async fn list(
        &self,
        acting_user_id: i64,
        params: ListParams,
    ) -> Result<Page<HttpRefResponse>, ApiError> {
        let query = params.into_query(acting_user_id)?.validated(HTTP_REF_SORT_FIELDS)?;
        let page = self.store.list_http_refs(&query).await?;
        Ok(page.map(HttpRefResponse::from))
    }

    pub async fn update_custom(
        &self,
        acting_user_id: i64,
        id: i64,
        req: UpdateHttpRefRequest,
    ) -> Result<HttpRefResponse, ApiError> {
        let current = self
            .store
            .get_http_ref(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "httpRef", id })?;
        authorize_mutation(&current, acting_user_id)?;
        if req.is_empty() {
            return Err(ApiError::EmptyUpdateRequest);
        }

        let mut updated = current.clone();
        if let Some(name) = req.name {
            validate_text("name", &name)?;
            if name == current.name {
                return Err(ApiError::FieldNotDifferent { field: "name" });
            }
            let matches = self
                .store
                .find_http_refs_by_title(&name, Some(acting_user_id))
                .await?;
            check_title_free(&matches, Some(id))?;
            updated.name = name;
        }
        if let Some(url) = req.url {
            validate_url_field("ref", &url)?;
            if url == current.url {
                return Err(ApiError::FieldNotDifferent { field: "ref" });
            }
            updated.url = url;
        }
        if let Some(description) = req.description {
            validate_text("description", &description)?;
            if current.description.as_deref() == Some(description.as_str()) {
                return Err(ApiError::FieldNotDifferent { field: "description" });
            }
            updated.description = Some(description);
        }

        let http_ref = self.store.update_http_ref(updated).await?;
        Ok(http_ref.into())
    }

    pub async fn delete_custom(&self, acting_user_id: i64, id: i64) -> Result<(), ApiError> {
        let current = self
            .store
            .get_http_ref(id)
            .await?
            .ok_or(ApiError::NotFound { resource: "httpRef", id })?;
        authorize_mutation(&current, acting_user_id)?;
        // Parents referencing this ref lose the association, nothing else.
        self.store.delete_http_ref(id).await?;
        Ok(())
    }
}
