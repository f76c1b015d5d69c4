use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Owned, Ownership};

/// Composition of exercises. The workout-level body-part set and
/// needs-equipment flag are derived from the attached exercises on every
/// read and mutation; they are deliberately not fields here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ownership: Ownership,
    pub exercise_ids: BTreeSet<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewWorkout {
    pub title: String,
    pub description: Option<String>,
    pub ownership: Ownership,
    pub exercise_ids: BTreeSet<i64>,
}

impl Owned for Workout {
    fn resource_id(&self) -> i64 {
        self.id
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }
}
