// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};
use std::collections::HashMap;

use crate::storage::StoreError;

/// Terminal request failure with an HTTP status and a stable machine-readable
/// code. Id-bearing kinds (`NotFound`, `OwnershipMismatch`, `ChildNotFound`)
/// surface the offending id in the message; scope-level kinds deliberately
/// do not leak which record triggered them.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    // 400 Bad Request
    WrongVariantRequested,
    OwnershipMismatch { id: i64 },
    DefaultResourceImmutable,
    TitleDuplicate,
    EmptyRequiredAssociation { field: &'static str },
    ChildNotFound { id: i64 },
    EmptyUpdateRequest,
    FieldNotDifferent { field: &'static str },
    InvalidArgumentCombination(String),
    ValidationError { field_errors: HashMap<String, String> },

    // 401 Unauthorized
    Unauthorized(String),

    // 404 Not Found
    NotFound { resource: &'static str, id: i64 },

    // 500 Internal Server Error
    InternalServerError(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::WrongVariantRequested
            | ApiError::OwnershipMismatch { .. }
            | ApiError::DefaultResourceImmutable
            | ApiError::TitleDuplicate
            | ApiError::EmptyRequiredAssociation { .. }
            | ApiError::ChildNotFound { .. }
            | ApiError::EmptyUpdateRequest
            | ApiError::FieldNotDifferent { .. }
            | ApiError::InvalidArgumentCombination(_)
            | ApiError::ValidationError { .. } => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::NotFound { .. } => 404,
            ApiError::InternalServerError(_) => 500,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::WrongVariantRequested => "WRONG_VARIANT_REQUESTED",
            ApiError::OwnershipMismatch { .. } => "OWNERSHIP_MISMATCH",
            ApiError::DefaultResourceImmutable => "DEFAULT_RESOURCE_IMMUTABLE",
            ApiError::TitleDuplicate => "TITLE_DUPLICATE",
            ApiError::EmptyRequiredAssociation { .. } => "EMPTY_REQUIRED_ASSOCIATION",
            ApiError::ChildNotFound { .. } => "CHILD_NOT_FOUND",
            ApiError::EmptyUpdateRequest => "EMPTY_UPDATE_REQUEST",
            ApiError::FieldNotDifferent { .. } => "FIELD_NOT_DIFFERENT",
            ApiError::InvalidArgumentCombination(_) => "INVALID_ARGUMENT_COMBINATION",
            ApiError::ValidationError { .. } => "VALIDATION_ERROR",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::NotFound { .. } => "NOT_FOUND",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> String {
        match self {
            ApiError::WrongVariantRequested => {
                "Requested resource variant does not match the endpoint".to_string()
            }
            ApiError::OwnershipMismatch { id } => {
                format!("Resource {} belongs to another user", id)
            }
            ApiError::DefaultResourceImmutable => {
                "Default resources cannot be modified".to_string()
            }
            ApiError::TitleDuplicate => "Title is already taken".to_string(),
            ApiError::EmptyRequiredAssociation { field } => {
                format!("At least one entry is required for '{}'", field)
            }
            ApiError::ChildNotFound { id } => {
                format!("Referenced child resource {} does not exist", id)
            }
            ApiError::EmptyUpdateRequest => {
                "Update request must change at least one field".to_string()
            }
            ApiError::FieldNotDifferent { field } => {
                format!("Field '{}' equals its current value", field)
            }
            ApiError::InvalidArgumentCombination(msg) => msg.clone(),
            ApiError::ValidationError { .. } => "Invalid field value".to_string(),
            ApiError::Unauthorized(msg) => msg.clone(),
            ApiError::NotFound { resource, id } => format!("{} {} not found", resource, id),
            ApiError::InternalServerError(msg) => msg.clone(),
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        match self {
            ApiError::ValidationError { field_errors } => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code(),
                    "field_errors": field_errors,
                })
            }
            _ => {
                json!({
                    "error": true,
                    "message": self.message(),
                    "code": self.error_code(),
                })
            }
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn invalid_argument_combination(message: impl Into<String>) -> Self {
        ApiError::InvalidArgumentCombination(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    /// Single-field validation failure.
    pub fn invalid_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut field_errors = HashMap::new();
        field_errors.insert(field.into(), reason.into());
        ApiError::ValidationError { field_errors }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            // A row that was just fetched disappeared under us; surfacing the
            // raw store error would leak persistence details.
            StoreError::NotFound => {
                tracing::error!("store reported missing row mid-request");
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            StoreError::Backend(msg) => {
                tracing::error!("storage backend error: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_taxonomy() {
        assert_eq!(ApiError::NotFound { resource: "exercise", id: 7 }.status_code(), 404);
        assert_eq!(ApiError::OwnershipMismatch { id: 1 }.status_code(), 400);
        assert_eq!(ApiError::TitleDuplicate.status_code(), 400);
        assert_eq!(ApiError::Unauthorized("no user".into()).status_code(), 401);
    }

    #[test]
    fn id_bearing_errors_carry_the_id() {
        assert!(ApiError::NotFound { resource: "workout", id: 42 }.message().contains("42"));
        assert!(ApiError::OwnershipMismatch { id: 42 }.message().contains("42"));
        assert!(ApiError::ChildNotFound { id: 42 }.message().contains("42"));
    }

    #[test]
    fn scope_level_errors_do_not_leak_ids() {
        assert!(!ApiError::TitleDuplicate.message().chars().any(|c| c.is_ascii_digit()));
        assert!(!ApiError::DefaultResourceImmutable.message().chars().any(|c| c.is_ascii_digit()));
    }

    #[test]
    fn validation_error_embeds_field_errors() {
        let err = ApiError::invalid_field("title", "contains forbidden characters");
        let body = err.to_json();
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["field_errors"]["title"], "contains forbidden characters");
    }
}
