use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Owned, Ownership};

/// Seeded category of mental activities (meditation, affirmation, ...).
/// Like body parts, mental types are always default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentalType {
    pub id: i64,
    pub name: String,
}

impl Owned for MentalType {
    fn resource_id(&self) -> i64 {
        self.id
    }

    fn ownership(&self) -> Ownership {
        Ownership::Default
    }
}

/// A mental-wellness activity. Requires exactly one mental type; http refs
/// are optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentalActivity {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub mental_type_id: i64,
    pub ownership: Ownership,
    pub http_ref_ids: BTreeSet<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMentalActivity {
    pub title: String,
    pub description: Option<String>,
    pub mental_type_id: i64,
    pub ownership: Ownership,
    pub http_ref_ids: BTreeSet<i64>,
}

impl Owned for MentalActivity {
    fn resource_id(&self) -> i64 {
        self.id
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }
}

/// Composition of mental activities, the mental-domain counterpart of a
/// workout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MentalWorkout {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub ownership: Ownership,
    pub mental_activity_ids: BTreeSet<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewMentalWorkout {
    pub title: String,
    pub description: Option<String>,
    pub ownership: Ownership,
    pub mental_activity_ids: BTreeSet<i64>,
}

impl Owned for MentalWorkout {
    fn resource_id(&self) -> i64 {
        self.id
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }
}
