use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Owned, Ownership};

/// A single exercise. Body parts are required (at least one); http refs are
/// optional. Association sets hold child ids only; the entities behind them
/// are resolved through the store, never held as in-memory references.
///
/// `BTreeSet` keeps every association id-sorted, which is what the response
/// ordering contract expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub needs_equipment: bool,
    pub ownership: Ownership,
    pub body_part_ids: BTreeSet<i64>,
    pub http_ref_ids: BTreeSet<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewExercise {
    pub title: String,
    pub description: Option<String>,
    pub needs_equipment: bool,
    pub ownership: Ownership,
    pub body_part_ids: BTreeSet<i64>,
    pub http_ref_ids: BTreeSet<i64>,
}

impl Owned for Exercise {
    fn resource_id(&self) -> i64 {
        self.id
    }

    fn ownership(&self) -> Ownership {
        self.ownership
    }
}
