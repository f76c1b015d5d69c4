//! Composition resolver: turns a submitted set of child ids into fully
//! loaded entities, enforcing existence and cross-user isolation.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::ApiError;
use crate::models::{
    BodyPart, Exercise, HttpRef, MentalActivity, MentalType, Owned, Ownership,
};
use crate::storage::{Store, StoreError};

/// Fetch seam for one child-entity kind. Keeping this a trait lets the
/// resolver stay a single generic routine across all five association kinds.
#[async_trait]
pub trait ChildLookup: Sync {
    type Child: Owned + Send;

    async fn fetch(&self, id: i64) -> Result<Option<Self::Child>, StoreError>;
}

/// Resolve `ids` to entities for the acting user.
///
/// - a required association with no ids is `EmptyRequiredAssociation`
/// - the first id without a row is `ChildNotFound` (fail fast, submission
///   order; remaining ids are not resolved)
/// - a resolved custom child owned by someone else is `OwnershipMismatch`
/// - default children pass regardless of the acting user
///
/// Duplicate submitted ids collapse to a single resolution.
pub async fn resolve_children<L: ChildLookup>(
    lookup: &L,
    ids: &[i64],
    acting_user_id: i64,
    field: &'static str,
    required: bool,
) -> Result<Vec<L::Child>, ApiError> {
    if required && ids.is_empty() {
        return Err(ApiError::EmptyRequiredAssociation { field });
    }

    let mut seen = HashSet::new();
    let mut resolved = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.insert(id) {
            continue;
        }
        let child = lookup
            .fetch(id)
            .await?
            .ok_or(ApiError::ChildNotFound { id })?;
        if let Ownership::Custom { owner_id } = child.ownership() {
            if owner_id != acting_user_id {
                return Err(ApiError::OwnershipMismatch { id });
            }
        }
        resolved.push(child);
    }
    Ok(resolved)
}

pub struct BodyPartLookup<'a>(pub &'a dyn Store);

#[async_trait]
impl ChildLookup for BodyPartLookup<'_> {
    type Child = BodyPart;

    async fn fetch(&self, id: i64) -> Result<Option<BodyPart>, StoreError> {
        self.0.get_body_part(id).await
    }
}

pub struct HttpRefLookup<'a>(pub &'a dyn Store);

#[async_trait]
impl ChildLookup for HttpRefLookup<'_> {
    type Child = HttpRef;

    async fn fetch(&self, id: i64) -> Result<Option<HttpRef>, StoreError> {
        self.0.get_http_ref(id).await
    }
}

pub struct ExerciseLookup<'a>(pub &'a dyn Store);

#[async_trait]
impl ChildLookup for ExerciseLookup<'_> {
    type Child = Exercise;

    async fn fetch(&self, id: i64) -> Result<Option<Exercise>, StoreError> {
        self.0.get_exercise(id).await
    }
}

pub struct MentalTypeLookup<'a>(pub &'a dyn Store);

#[async_trait]
impl ChildLookup for MentalTypeLookup<'_> {
    type Child = MentalType;

    async fn fetch(&self, id: i64) -> Result<Option<MentalType>, StoreError> {
        self.0.get_mental_type(id).await
    }
}

pub struct MentalActivityLookup<'a>(pub &'a dyn Store);

#[async_trait]
impl ChildLookup for MentalActivityLookup<'_> {
    type Child = MentalActivity;

    async fn fetch(&self, id: i64) -> Result<Option<MentalActivity>, StoreError> {
        self.0.get_mental_activity(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[derive(Debug)]
    struct Fake {
        id: i64,
        ownership: Ownership,
    }

    impl Owned for Fake {
        fn resource_id(&self) -> i64 {
            self.id
        }
        fn ownership(&self) -> Ownership {
            self.ownership
        }
    }

    struct MapLookup(HashMap<i64, Ownership>);

    #[async_trait]
    impl ChildLookup for MapLookup {
        type Child = Fake;

        async fn fetch(&self, id: i64) -> Result<Option<Fake>, StoreError> {
            Ok(self.0.get(&id).map(|o| Fake { id, ownership: *o }))
        }
    }

    fn lookup(entries: &[(i64, Ownership)]) -> MapLookup {
        MapLookup(entries.iter().copied().collect())
    }

    #[tokio::test]
    async fn empty_required_set_fails() {
        let l = lookup(&[]);
        let err = resolve_children(&l, &[], 1, "bodyParts", true).await.unwrap_err();
        assert_eq!(err, ApiError::EmptyRequiredAssociation { field: "bodyParts" });
    }

    #[tokio::test]
    async fn empty_optional_set_resolves_to_nothing() {
        let l = lookup(&[]);
        let resolved = resolve_children(&l, &[], 1, "httpRefs", false).await.unwrap();
        assert!(resolved.is_empty());
    }

    #[tokio::test]
    async fn first_missing_id_wins() {
        let l = lookup(&[(1, Ownership::Default)]);
        let err = resolve_children(&l, &[1, 99, 98], 1, "httpRefs", false).await.unwrap_err();
        assert_eq!(err, ApiError::ChildNotFound { id: 99 });
    }

    #[tokio::test]
    async fn foreign_custom_child_is_rejected_with_its_id() {
        let l = lookup(&[(1, Ownership::Default), (2, Ownership::Custom { owner_id: 7 })]);
        let err = resolve_children(&l, &[1, 2], 1, "httpRefs", false).await.unwrap_err();
        assert_eq!(err, ApiError::OwnershipMismatch { id: 2 });
    }

    #[tokio::test]
    async fn default_children_pass_for_anyone() {
        let l = lookup(&[(1, Ownership::Default), (2, Ownership::Default)]);
        let resolved = resolve_children(&l, &[2, 1], 999, "bodyParts", true).await.unwrap();
        assert_eq!(resolved.len(), 2);
    }

    #[tokio::test]
    async fn own_custom_children_pass() {
        let l = lookup(&[(4, Ownership::Custom { owner_id: 3 })]);
        let resolved = resolve_children(&l, &[4], 3, "httpRefs", false).await.unwrap();
        assert_eq!(resolved[0].resource_id(), 4);
    }

    #[tokio::test]
    async fn duplicate_ids_collapse() {
        let l = lookup(&[(1, Ownership::Default)]);
        let resolved = resolve_children(&l, &[1, 1, 1], 1, "bodyParts", true).await.unwrap();
        assert_eq!(resolved.len(), 1);
    }
}
