use crate::error::ApiError;
use crate::models::Owned;

/// Per-owner duplicate-title enforcement.
///
/// `matches` is the pre-fetched set of resources carrying the candidate title
/// within the relevant scope: defaults plus the acting owner's customs. Only
/// the custom rows can collide; a custom title may shadow a default title.
/// Any custom survivor after excluding the resource being updated is a
/// duplicate. The error intentionally carries no id; title collisions must
/// not reveal which record collided.
pub fn check_title_free<R: Owned>(matches: &[R], exclude_id: Option<i64>) -> Result<(), ApiError> {
    let collision = matches
        .iter()
        .any(|m| m.is_custom() && exclude_id.map_or(true, |id| m.resource_id() != id));
    if collision {
        Err(ApiError::TitleDuplicate)
    } else {
        Ok(())
    }
}
