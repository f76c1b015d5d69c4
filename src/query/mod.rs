//! Filtered query composer: the validated description of a paginated, sorted,
//! multi-predicate listing that the storage layer executes.

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::ApiError;
use crate::models::Ownership;
use crate::validation::validate_optional_text;

/// Whether a listing targets default resources, one user's customs, or the
/// union of both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisibilityScope {
    Default,
    Custom,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// Sortable fields per resource. Sorting is validated against these
/// allow-lists before any store call; an unknown field never reaches the
/// backend.
pub const EXERCISE_SORT_FIELDS: &[&str] = &["id", "title", "description", "needsEquipment"];
pub const WORKOUT_SORT_FIELDS: &[&str] = &["id", "title", "description"];
pub const HTTP_REF_SORT_FIELDS: &[&str] = &["id", "name", "description"];
pub const MENTAL_ACTIVITY_SORT_FIELDS: &[&str] = &["id", "title", "description"];
pub const MENTAL_WORKOUT_SORT_FIELDS: &[&str] = &["id", "title", "description"];

/// Predicate set for one listing. Built by handlers/services, validated via
/// [`ResourceQuery::validated`], executed by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceQuery {
    pub scope: VisibilityScope,
    pub owner_id: Option<i64>,
    /// Case-sensitive substring match.
    pub title: Option<String>,
    /// Case-sensitive substring match.
    pub description: Option<String>,
    pub needs_equipment: Option<bool>,
    /// Intersect-any over the resource's child-id set (OR across the given
    /// ids, not containment of all).
    pub child_ids: Option<Vec<i64>>,
    /// Absent means ascending by id.
    pub sort_field: Option<String>,
    pub sort_direction: SortDirection,
    /// Zero-based.
    pub page: u32,
    pub size: u32,
}

impl ResourceQuery {
    pub fn new(scope: VisibilityScope, owner_id: Option<i64>) -> Self {
        Self {
            scope,
            owner_id,
            title: None,
            description: None,
            needs_equipment: None,
            child_ids: None,
            sort_field: None,
            sort_direction: SortDirection::Asc,
            page: 0,
            size: config::config().api.default_page_size,
        }
    }

    /// Check scope/owner consistency, text predicates and the sort field;
    /// clamp the page size. Returns the query ready for the store.
    pub fn validated(mut self, allowed_sort_fields: &[&str]) -> Result<Self, ApiError> {
        match (self.scope, self.owner_id) {
            (VisibilityScope::Custom, None) => {
                return Err(ApiError::invalid_argument_combination(
                    "custom scope requires an owner id",
                ));
            }
            (VisibilityScope::Both, None) => {
                return Err(ApiError::invalid_argument_combination(
                    "combined scope requires an owner id",
                ));
            }
            (VisibilityScope::Default, Some(_)) => {
                return Err(ApiError::invalid_argument_combination(
                    "default scope does not take an owner id",
                ));
            }
            _ => {}
        }

        validate_optional_text("title", self.title.as_deref())?;
        validate_optional_text("description", self.description.as_deref())?;

        if let Some(field) = self.sort_field.as_deref() {
            if !allowed_sort_fields.contains(&field) {
                return Err(ApiError::invalid_field(
                    "sortField",
                    format!("unknown sort field '{}'", field),
                ));
            }
        }

        let max = config::config().api.max_page_size;
        if self.size == 0 {
            self.size = config::config().api.default_page_size;
        }
        if self.size > max {
            tracing::warn!("page size {} exceeds max {}, capping", self.size, max);
            self.size = max;
        }
        Ok(self)
    }

    /// Scope predicate over one row's ownership.
    pub fn scope_matches(&self, ownership: Ownership) -> bool {
        match self.scope {
            VisibilityScope::Default => !ownership.is_custom(),
            VisibilityScope::Custom => ownership.owner_id() == self.owner_id,
            VisibilityScope::Both => {
                !ownership.is_custom() || ownership.owner_id() == self.owner_id
            }
        }
    }
}

/// Case-sensitive substring predicate used by the text filters.
pub fn text_matches(haystack: Option<&str>, needle: &str) -> bool {
    haystack.map_or(false, |h| h.contains(needle))
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
}

impl<T> Page<T> {
    /// Slice an already-filtered, already-sorted row set into one page.
    pub fn paginate(rows: Vec<T>, page: u32, size: u32) -> Self {
        let total_elements = rows.len() as u64;
        let total_pages = if size == 0 {
            0
        } else {
            ((total_elements + size as u64 - 1) / size as u64) as u32
        };
        let start = (page as usize).saturating_mul(size as usize);
        let items: Vec<T> = rows
            .into_iter()
            .skip(start)
            .take(size as usize)
            .collect();
        Self { items, page, size, total_elements, total_pages }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            size: self.size,
            total_elements: self.total_elements,
            total_pages: self.total_pages,
        }
    }
}
