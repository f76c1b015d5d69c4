pub mod body_part;
pub mod exercise;
pub mod http_ref;
pub mod mental;
pub mod user;
pub mod workout;

pub use body_part::BodyPart;
pub use exercise::{Exercise, NewExercise};
pub use http_ref::{HttpRef, NewHttpRef};
pub use mental::{MentalActivity, MentalType, MentalWorkout, NewMentalActivity, NewMentalWorkout};
pub use user::User;
pub use workout::{NewWorkout, Workout};

use serde::{Deserialize, Serialize};

/// Default/custom duality of every user-facing resource.
///
/// Default resources are seeded, globally visible and immutable through the
/// owner-scoped mutation paths. Custom resources belong to exactly one user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "snake_case")]
pub enum Ownership {
    Default,
    Custom { owner_id: i64 },
}

impl Ownership {
    pub fn is_custom(&self) -> bool {
        matches!(self, Ownership::Custom { .. })
    }

    pub fn owner_id(&self) -> Option<i64> {
        match self {
            Ownership::Default => None,
            Ownership::Custom { owner_id } => Some(*owner_id),
        }
    }
}

/// Common surface of every ownable resource, so the ownership validator and
/// the duplicate-title checker can stay generic over the concrete entity.
pub trait Owned {
    fn resource_id(&self) -> i64;
    fn ownership(&self) -> Ownership;

    fn is_custom(&self) -> bool {
        self.ownership().is_custom()
    }

    fn owner_id(&self) -> Option<i64> {
        self.ownership().owner_id()
    }
}
