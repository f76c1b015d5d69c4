use crate::error::ApiError;
use crate::models::{Owned, Ownership};

/// Which side of the default/custom duality an endpoint serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Default,
    Custom,
}

/// Pure visibility predicate over an already-fetched resource.
///
/// A default resource reached through a custom endpoint (or the reverse) is
/// `WrongVariantRequested`; a custom resource reached by anyone but its owner
/// is `OwnershipMismatch` carrying the resource id.
pub fn authorize<R: Owned>(
    resource: &R,
    acting_user_id: i64,
    required: Variant,
) -> Result<(), ApiError> {
    match (resource.ownership(), required) {
        (Ownership::Default, Variant::Default) => Ok(()),
        (Ownership::Default, Variant::Custom) | (Ownership::Custom { .. }, Variant::Default) => {
            Err(ApiError::WrongVariantRequested)
        }
        (Ownership::Custom { owner_id }, Variant::Custom) => {
            if owner_id == acting_user_id {
                Ok(())
            } else {
                Err(ApiError::OwnershipMismatch { id: resource.resource_id() })
            }
        }
    }
}

/// Default-endpoint reads need no acting user at all; the only thing to
/// check is the variant.
pub fn require_default<R: Owned>(resource: &R) -> Result<(), ApiError> {
    match resource.ownership() {
        Ownership::Default => Ok(()),
        Ownership::Custom { .. } => Err(ApiError::WrongVariantRequested),
    }
}

/// Mutation-path variant of [`authorize`]: default resources are immutable
/// through owner-scoped paths, so hitting one is `DefaultResourceImmutable`
/// rather than a variant mismatch.
pub fn authorize_mutation<R: Owned>(resource: &R, acting_user_id: i64) -> Result<(), ApiError> {
    match resource.ownership() {
        Ownership::Default => Err(ApiError::DefaultResourceImmutable),
        Ownership::Custom { owner_id } if owner_id == acting_user_id => Ok(()),
        Ownership::Custom { .. } => {
            Err(ApiError::OwnershipMismatch { id: resource.resource_id() })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BodyPart;

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

    #[test]
    fn owner_passes_custom_check() {
        let r = Fake { id: 5, ownership: Ownership::Custom { owner_id: 1 } };
        assert!(authorize(&r, 1, Variant::Custom).is_ok());
        assert!(authorize_mutation(&r, 1).is_ok());
    }

    #[test]
    fn non_owner_fails_with_resource_id() {
        let r = Fake { id: 5, ownership: Ownership::Custom { owner_id: 1 } };
        assert_eq!(authorize(&r, 2, Variant::Custom), Err(ApiError::OwnershipMismatch { id: 5 }));
        assert_eq!(authorize_mutation(&r, 2), Err(ApiError::OwnershipMismatch { id: 5 }));
    }

    #[test]
    fn default_through_custom_path_is_wrong_variant() {
        let r = Fake { id: 9, ownership: Ownership::Default };
        assert_eq!(authorize(&r, 1, Variant::Custom), Err(ApiError::WrongVariantRequested));
    }

    #[test]
    fn custom_through_default_path_is_wrong_variant() {
        let r = Fake { id: 9, ownership: Ownership::Custom { owner_id: 1 } };
        assert_eq!(authorize(&r, 1, Variant::Default), Err(ApiError::WrongVariantRequested));
    }

    #[test]
    fn default_reads_need_no_user() {
        assert!(require_default(&Fake { id: 9, ownership: Ownership::Default }).is_ok());
        assert_eq!(
            require_default(&Fake { id: 9, ownership: Ownership::Custom { owner_id: 1 } }),
            Err(ApiError::WrongVariantRequested)
        );
    }

    #[test]
    fn default_mutation_is_immutable() {
        let r = Fake { id: 9, ownership: Ownership::Default };
        assert_eq!(authorize_mutation(&r, 1), Err(ApiError::DefaultResourceImmutable));
    }

    #[test]
    fn anonymous_default_read_passes() {
        let bp = BodyPart { id: 1, name: "Chest".into() };
        // Acting user id is irrelevant for default-variant reads.
        assert!(authorize(&bp, 0, Variant::Default).is_ok());
    }
}
