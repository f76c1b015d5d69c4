//! Derived workout attributes, recomputed from the live child set on every
//! read and mutation. Nothing here is ever persisted as ground truth.

use std::collections::BTreeSet;

use crate::models::Exercise;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutDerived {
    /// Union of the exercises' body-part ids, ascending.
    pub body_part_ids: Vec<i64>,
    /// True iff any attached exercise needs equipment.
    pub needs_equipment: bool,
}

pub fn aggregate(exercises: &[Exercise]) -> WorkoutDerived {
    let union: BTreeSet<i64> = exercises
        .iter()
        .flat_map(|e| e.body_part_ids.iter().copied())
        .collect();
    WorkoutDerived {
        body_part_ids: union.into_iter().collect(),
        needs_equipment: exercises.iter().any(|e| e.needs_equipment),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ownership;
    use chrono::Utc;

    fn exercise(id: i64, needs_equipment: bool, body_parts: &[i64]) -> Exercise {
        Exercise {
            id,
            title: format!("ex-{}", id),
            description: None,
            needs_equipment,
            ownership: Ownership::Default,
            body_part_ids: body_parts.iter().copied().collect(),
            http_ref_ids: BTreeSet::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn unions_body_parts_sorted_and_ors_equipment() {
        let a = exercise(1, true, &[1, 2]);
        let b = exercise(2, false, &[2, 3]);
        let derived = aggregate(&[a, b]);
        assert_eq!(derived.body_part_ids, vec![1, 2, 3]);
        assert!(derived.needs_equipment);
    }

    #[test]
    fn permutation_of_children_is_irrelevant() {
        let a = exercise(1, false, &[5, 1]);
        let b = exercise(2, true, &[3]);
        let c = exercise(3, false, &[1, 3]);
        let forward = aggregate(&[a.clone(), b.clone(), c.clone()]);
        let backward = aggregate(&[c, b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.body_part_ids, vec![1, 3, 5]);
    }

    #[test]
    fn empty_child_set_yields_empty_derived() {
        let derived = aggregate(&[]);
        assert!(derived.body_part_ids.is_empty());
        assert!(!derived.needs_equipment);
    }

    #[test]
    fn no_equipment_when_no_child_needs_it() {
        let derived = aggregate(&[exercise(1, false, &[1]), exercise(2, false, &[2])]);
        assert!(!derived.needs_equipment);
    }
}
