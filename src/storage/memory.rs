//! In-memory arena store: every entity table is a map keyed by id, and the
//! many-to-many links live as id sets on the entities themselves. This is the
//! engine the test suite runs against and the default development backend.

use std::cmp::Ordering;
use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::models::{
    BodyPart, Exercise, HttpRef, MentalActivity, MentalType, MentalWorkout, NewExercise,
    NewHttpRef, NewMentalActivity, NewMentalWorkout, NewWorkout, Owned, User, Workout,
};
use crate::query::{text_matches, Page, ResourceQuery, SortDirection};

use super::{Store, StoreError};

#[derive(Default)]
struct Tables {
    users: HashMap<i64, User>,
    body_parts: HashMap<i64, BodyPart>,
    mental_types: HashMap<i64, MentalType>,
    http_refs: HashMap<i64, HttpRef>,
    exercises: HashMap<i64, Exercise>,
    workouts: HashMap<i64, Workout>,
    mental_activities: HashMap<i64, MentalActivity>,
    mental_workouts: HashMap<i64, MentalWorkout>,
    sequences: HashMap<&'static str, i64>,
}

impl Tables {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }
}

pub struct MemoryStore {
    inner: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self { inner: RwLock::new(Tables::default()) }
    }

    /// Seeding path for the shared default lookups. User-facing mutation
    /// never reaches these tables.
    pub async fn seed_defaults(&self) -> Result<(), StoreError> {
        for name in ["Chest", "Back", "Shoulders", "Arms", "Core", "Legs"] {
            self.insert_body_part(name).await?;
        }
        for name in ["Meditation", "Affirmation", "Breathing"] {
            self.insert_mental_type(name).await?;
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Comparable projection of one sortable field.
enum SortKey<'a> {
    Int(i64),
    Text(&'a str),
    OptText(Option<&'a str>),
    Flag(bool),
}

impl SortKey<'_> {
    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (SortKey::Int(a), SortKey::Int(b)) => a.cmp(b),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            (SortKey::OptText(a), SortKey::OptText(b)) => a.cmp(b),
            (SortKey::Flag(a), SortKey::Flag(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Sort rows by the projected key in the requested direction, ids ascending
/// as the tiebreak so pagination stays deterministic.
fn sort_rows<T: Owned>(
    rows: &mut [T],
    direction: SortDirection,
    key: impl for<'a> Fn(&'a T) -> SortKey<'a>,
) {
    rows.sort_by(|a, b| {
        let ord = key(a).compare(&key(b));
        let ord = match direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        };
        ord.then(a.resource_id().cmp(&b.resource_id()))
    });
}

fn by_ids<T: Clone + Owned>(table: &HashMap<i64, T>, ids: &[i64]) -> Vec<T> {
    let mut rows: Vec<T> = ids.iter().filter_map(|id| table.get(id)).cloned().collect();
    rows.sort_by_key(|r| r.resource_id());
    rows.dedup_by_key(|r| r.resource_id());
    rows
}

fn title_scope_matches<T: Owned>(row: &T, owner_id: Option<i64>) -> bool {
    !row.is_custom() || row.owner_id() == owner_id
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert_user(&self, username: &str, email: &str) -> Result<User, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("users");
        let user = User { id, username: username.to_string(), email: email.to_string() };
        tables.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn insert_body_part(&self, name: &str) -> Result<BodyPart, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("body_parts");
        let row = BodyPart { id, name: name.to_string() };
        tables.body_parts.insert(id, row.clone());
        Ok(row)
    }

    async fn get_body_part(&self, id: i64) -> Result<Option<BodyPart>, StoreError> {
        Ok(self.inner.read().await.body_parts.get(&id).cloned())
    }

    async fn body_parts_by_ids(&self, ids: &[i64]) -> Result<Vec<BodyPart>, StoreError> {
        Ok(by_ids(&self.inner.read().await.body_parts, ids))
    }

    async fn list_body_parts(&self) -> Result<Vec<BodyPart>, StoreError> {
        let mut rows: Vec<BodyPart> =
            self.inner.read().await.body_parts.values().cloned().collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn insert_mental_type(&self, name: &str) -> Result<MentalType, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("mental_types");
        let row = MentalType { id, name: name.to_string() };
        tables.mental_types.insert(id, row.clone());
        Ok(row)
    }

    async fn get_mental_type(&self, id: i64) -> Result<Option<MentalType>, StoreError> {
        Ok(self.inner.read().await.mental_types.get(&id).cloned())
    }

    async fn list_mental_types(&self) -> Result<Vec<MentalType>, StoreError> {
        let mut rows: Vec<MentalType> =
            self.inner.read().await.mental_types.values().cloned().collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn insert_http_ref(&self, new: NewHttpRef) -> Result<HttpRef, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("http_refs");
        let now = Utc::now();
        let row = HttpRef {
            id,
            name: new.name,
            url: new.url,
            description: new.description,
            ownership: new.ownership,
            created_at: now,
            updated_at: now,
        };
        tables.http_refs.insert(id, row.clone());
        Ok(row)
    }

    async fn get_http_ref(&self, id: i64) -> Result<Option<HttpRef>, StoreError> {
        Ok(self.inner.read().await.http_refs.get(&id).cloned())
    }

    async fn http_refs_by_ids(&self, ids: &[i64]) -> Result<Vec<HttpRef>, StoreError> {
        Ok(by_ids(&self.inner.read().await.http_refs, ids))
    }

    async fn find_http_refs_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<HttpRef>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .http_refs
            .values()
            .filter(|r| r.name == title && title_scope_matches(*r, owner_id))
            .cloned()
            .collect())
    }

    async fn update_http_ref(&self, mut row: HttpRef) -> Result<HttpRef, StoreError> {
        let mut tables = self.inner.write().await;
        if !tables.http_refs.contains_key(&row.id) {
            return Err(StoreError::NotFound);
        }
        row.updated_at = Utc::now();
        tables.http_refs.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_http_ref(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        if tables.http_refs.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        // Detach only; referencing parents survive.
        for exercise in tables.exercises.values_mut() {
            exercise.http_ref_ids.remove(&id);
        }
        for activity in tables.mental_activities.values_mut() {
            activity.http_ref_ids.remove(&id);
        }
        Ok(())
    }

    async fn list_http_refs(&self, query: &ResourceQuery) -> Result<Page<HttpRef>, StoreError> {
        let tables = self.inner.read().await;
        let mut rows: Vec<HttpRef> = tables
            .http_refs
            .values()
            .filter(|r| query.scope_matches(r.ownership))
            .filter(|r| query.title.as_deref().map_or(true, |t| text_matches(Some(&r.name), t)))
            .filter(|r| {
                query
                    .description
                    .as_deref()
                    .map_or(true, |d| text_matches(r.description.as_deref(), d))
            })
            .cloned()
            .collect();
        sort_rows(&mut rows, query.sort_direction, |r| match query.sort_field.as_deref() {
            Some("name") => SortKey::Text(&r.name),
            Some("description") => SortKey::OptText(r.description.as_deref()),
            _ => SortKey::Int(r.id),
        });
        Ok(Page::paginate(rows, query.page, query.size))
    }

    async fn insert_exercise(&self, new: NewExercise) -> Result<Exercise, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("exercises");
        let now = Utc::now();
        let row = Exercise {
            id,
            title: new.title,
            description: new.description,
            needs_equipment: new.needs_equipment,
            ownership: new.ownership,
            body_part_ids: new.body_part_ids,
            http_ref_ids: new.http_ref_ids,
            created_at: now,
            updated_at: now,
        };
        tables.exercises.insert(id, row.clone());
        Ok(row)
    }

    async fn get_exercise(&self, id: i64) -> Result<Option<Exercise>, StoreError> {
        Ok(self.inner.read().await.exercises.get(&id).cloned())
    }

    async fn exercises_by_ids(&self, ids: &[i64]) -> Result<Vec<Exercise>, StoreError> {
        Ok(by_ids(&self.inner.read().await.exercises, ids))
    }

    async fn find_exercises_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<Exercise>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .exercises
            .values()
            .filter(|r| r.title == title && title_scope_matches(*r, owner_id))
            .cloned()
            .collect())
    }

    async fn update_exercise(&self, mut row: Exercise) -> Result<Exercise, StoreError> {
        let mut tables = self.inner.write().await;
        if !tables.exercises.contains_key(&row.id) {
            return Err(StoreError::NotFound);
        }
        row.updated_at = Utc::now();
        tables.exercises.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_exercise(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        if tables.exercises.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        for workout in tables.workouts.values_mut() {
            workout.exercise_ids.remove(&id);
        }
        Ok(())
    }

    async fn list_exercises(&self, query: &ResourceQuery) -> Result<Page<Exercise>, StoreError> {
        let tables = self.inner.read().await;
        let mut rows: Vec<Exercise> = tables
            .exercises
            .values()
            .filter(|r| query.scope_matches(r.ownership))
            .filter(|r| query.title.as_deref().map_or(true, |t| text_matches(Some(&r.title), t)))
            .filter(|r| {
                query
                    .description
                    .as_deref()
                    .map_or(true, |d| text_matches(r.description.as_deref(), d))
            })
            .filter(|r| query.needs_equipment.map_or(true, |f| r.needs_equipment == f))
            .filter(|r| {
                query
                    .child_ids
                    .as_ref()
                    .map_or(true, |ids| ids.iter().any(|id| r.body_part_ids.contains(id)))
            })
            .cloned()
            .collect();
        sort_rows(&mut rows, query.sort_direction, |r| match query.sort_field.as_deref() {
            Some("title") => SortKey::Text(&r.title),
            Some("description") => SortKey::OptText(r.description.as_deref()),
            Some("needsEquipment") => SortKey::Flag(r.needs_equipment),
            _ => SortKey::Int(r.id),
        });
        Ok(Page::paginate(rows, query.page, query.size))
    }

    async fn insert_workout(&self, new: NewWorkout) -> Result<Workout, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("workouts");
        let now = Utc::now();
        let row = Workout {
            id,
            title: new.title,
            description: new.description,
            ownership: new.ownership,
            exercise_ids: new.exercise_ids,
            created_at: now,
            updated_at: now,
        };
        tables.workouts.insert(id, row.clone());
        Ok(row)
    }

    async fn get_workout(&self, id: i64) -> Result<Option<Workout>, StoreError> {
        Ok(self.inner.read().await.workouts.get(&id).cloned())
    }

    async fn find_workouts_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<Workout>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .workouts
            .values()
            .filter(|r| r.title == title && title_scope_matches(*r, owner_id))
            .cloned()
            .collect())
    }

    async fn update_workout(&self, mut row: Workout) -> Result<Workout, StoreError> {
        let mut tables = self.inner.write().await;
        if !tables.workouts.contains_key(&row.id) {
            return Err(StoreError::NotFound);
        }
        row.updated_at = Utc::now();
        tables.workouts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_workout(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        if tables.workouts.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_workouts(&self, query: &ResourceQuery) -> Result<Page<Workout>, StoreError> {
        let tables = self.inner.read().await;
        let mut rows: Vec<Workout> = tables
            .workouts
            .values()
            .filter(|r| query.scope_matches(r.ownership))
            .filter(|r| query.title.as_deref().map_or(true, |t| text_matches(Some(&r.title), t)))
            .filter(|r| {
                query
                    .description
                    .as_deref()
                    .map_or(true, |d| text_matches(r.description.as_deref(), d))
            })
            .filter(|r| {
                query
                    .child_ids
                    .as_ref()
                    .map_or(true, |ids| ids.iter().any(|id| r.exercise_ids.contains(id)))
            })
            .cloned()
            .collect();
        sort_rows(&mut rows, query.sort_direction, |r| match query.sort_field.as_deref() {
            Some("title") => SortKey::Text(&r.title),
            Some("description") => SortKey::OptText(r.description.as_deref()),
            _ => SortKey::Int(r.id),
        });
        Ok(Page::paginate(rows, query.page, query.size))
    }

    async fn insert_mental_activity(
        &self,
        new: NewMentalActivity,
    ) -> Result<MentalActivity, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("mental_activities");
        let now = Utc::now();
        let row = MentalActivity {
            id,
            title: new.title,
            description: new.description,
            mental_type_id: new.mental_type_id,
            ownership: new.ownership,
            http_ref_ids: new.http_ref_ids,
            created_at: now,
            updated_at: now,
        };
        tables.mental_activities.insert(id, row.clone());
        Ok(row)
    }

    async fn get_mental_activity(&self, id: i64) -> Result<Option<MentalActivity>, StoreError> {
        Ok(self.inner.read().await.mental_activities.get(&id).cloned())
    }

    async fn mental_activities_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<MentalActivity>, StoreError> {
        Ok(by_ids(&self.inner.read().await.mental_activities, ids))
    }

    async fn find_mental_activities_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<MentalActivity>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .mental_activities
            .values()
            .filter(|r| r.title == title && title_scope_matches(*r, owner_id))
            .cloned()
            .collect())
    }

    async fn update_mental_activity(
        &self,
        mut row: MentalActivity,
    ) -> Result<MentalActivity, StoreError> {
        let mut tables = self.inner.write().await;
        if !tables.mental_activities.contains_key(&row.id) {
            return Err(StoreError::NotFound);
        }
        row.updated_at = Utc::now();
        tables.mental_activities.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_mental_activity(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        if tables.mental_activities.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        for workout in tables.mental_workouts.values_mut() {
            workout.mental_activity_ids.remove(&id);
        }
        Ok(())
    }

    async fn list_mental_activities(
        &self,
        query: &ResourceQuery,
    ) -> Result<Page<MentalActivity>, StoreError> {
        let tables = self.inner.read().await;
        let mut rows: Vec<MentalActivity> = tables
            .mental_activities
            .values()
            .filter(|r| query.scope_matches(r.ownership))
            .filter(|r| query.title.as_deref().map_or(true, |t| text_matches(Some(&r.title), t)))
            .filter(|r| {
                query
                    .description
                    .as_deref()
                    .map_or(true, |d| text_matches(r.description.as_deref(), d))
            })
            .filter(|r| {
                query
                    .child_ids
                    .as_ref()
                    .map_or(true, |ids| ids.iter().any(|id| r.http_ref_ids.contains(id)))
            })
            .cloned()
            .collect();
        sort_rows(&mut rows, query.sort_direction, |r| match query.sort_field.as_deref() {
            Some("title") => SortKey::Text(&r.title),
            Some("description") => SortKey::OptText(r.description.as_deref()),
            _ => SortKey::Int(r.id),
        });
        Ok(Page::paginate(rows, query.page, query.size))
    }

    async fn insert_mental_workout(
        &self,
        new: NewMentalWorkout,
    ) -> Result<MentalWorkout, StoreError> {
        let mut tables = self.inner.write().await;
        let id = tables.next_id("mental_workouts");
        let now = Utc::now();
        let row = MentalWorkout {
            id,
            title: new.title,
            description: new.description,
            ownership: new.ownership,
            mental_activity_ids: new.mental_activity_ids,
            created_at: now,
            updated_at: now,
        };
        tables.mental_workouts.insert(id, row.clone());
        Ok(row)
    }

    async fn get_mental_workout(&self, id: i64) -> Result<Option<MentalWorkout>, StoreError> {
        Ok(self.inner.read().await.mental_workouts.get(&id).cloned())
    }

    async fn find_mental_workouts_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<MentalWorkout>, StoreError> {
        let tables = self.inner.read().await;
        Ok(tables
            .mental_workouts
            .values()
            .filter(|r| r.title == title && title_scope_matches(*r, owner_id))
            .cloned()
            .collect())
    }

    async fn update_mental_workout(
        &self,
        mut row: MentalWorkout,
    ) -> Result<MentalWorkout, StoreError> {
        let mut tables = self.inner.write().await;
        if !tables.mental_workouts.contains_key(&row.id) {
            return Err(StoreError::NotFound);
        }
        row.updated_at = Utc::now();
        tables.mental_workouts.insert(row.id, row.clone());
        Ok(row)
    }

    async fn delete_mental_workout(&self, id: i64) -> Result<(), StoreError> {
        let mut tables = self.inner.write().await;
        if tables.mental_workouts.remove(&id).is_none() {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_mental_workouts(
        &self,
        query: &ResourceQuery,
    ) -> Result<Page<MentalWorkout>, StoreError> {
        let tables = self.inner.read().await;
        let mut rows: Vec<MentalWorkout> = tables
            .mental_workouts
            .values()
            .filter(|r| query.scope_matches(r.ownership))
            .filter(|r| query.title.as_deref().map_or(true, |t| text_matches(Some(&r.title), t)))
            .filter(|r| {
                query
                    .description
                    .as_deref()
                    .map_or(true, |d| text_matches(r.description.as_deref(), d))
            })
            .filter(|r| {
                query.child_ids.as_ref().map_or(true, |ids| {
                    ids.iter().any(|id| r.mental_activity_ids.contains(id))
                })
            })
            .cloned()
            .collect();
        sort_rows(&mut rows, query.sort_direction, |r| match query.sort_field.as_deref() {
            Some("title") => SortKey::Text(&r.title),
            Some("description") => SortKey::OptText(r.description.as_deref()),
            _ => SortKey::Int(r.id),
        });
        Ok(Page::paginate(rows, query.page, query.size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Ownership;
    use crate::query::VisibilityScope;
    use std::collections::BTreeSet;

    fn new_exercise(title: &str, ownership: Ownership, body_parts: &[i64]) -> NewExercise {
        NewExercise {
            title: title.to_string(),
            description: None,
            needs_equipment: false,
            ownership,
            body_part_ids: body_parts.iter().copied().collect(),
            http_ref_ids: BTreeSet::new(),
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_sequentially_per_table() {
        let store = MemoryStore::new();
        let a = store.insert_body_part("Chest").await.unwrap();
        let b = store.insert_body_part("Back").await.unwrap();
        let r = store
            .insert_http_ref(NewHttpRef {
                name: "clip".into(),
                url: "https://example.com".into(),
                description: None,
                ownership: Ownership::Default,
            })
            .await
            .unwrap();
        assert_eq!((a.id, b.id, r.id), (1, 2, 1));
    }

    #[tokio::test]
    async fn delete_http_ref_detaches_from_parents() {
        let store = MemoryStore::new();
        store.insert_body_part("Chest").await.unwrap();
        let r = store
            .insert_http_ref(NewHttpRef {
                name: "clip".into(),
                url: "https://example.com".into(),
                description: None,
                ownership: Ownership::Custom { owner_id: 1 },
            })
            .await
            .unwrap();
        let mut new = new_exercise("Push-up", Ownership::Custom { owner_id: 1 }, &[1]);
        new.http_ref_ids.insert(r.id);
        let e = store.insert_exercise(new).await.unwrap();

        store.delete_http_ref(r.id).await.unwrap();

        let e = store.get_exercise(e.id).await.unwrap().unwrap();
        assert!(e.http_ref_ids.is_empty());
        assert!(store.get_http_ref(r.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_exercise_detaches_from_workouts_without_cascading() {
        let store = MemoryStore::new();
        store.insert_body_part("Legs").await.unwrap();
        let e1 = store
            .insert_exercise(new_exercise("Squat", Ownership::Custom { owner_id: 1 }, &[1]))
            .await
            .unwrap();
        let e2 = store
            .insert_exercise(new_exercise("Lunge", Ownership::Custom { owner_id: 1 }, &[1]))
            .await
            .unwrap();
        let w = store
            .insert_workout(NewWorkout {
                title: "Leg day".into(),
                description: None,
                ownership: Ownership::Custom { owner_id: 1 },
                exercise_ids: [e1.id, e2.id].into_iter().collect(),
            })
            .await
            .unwrap();

        store.delete_exercise(e1.id).await.unwrap();

        let w = store.get_workout(w.id).await.unwrap().unwrap();
        assert_eq!(w.exercise_ids.iter().copied().collect::<Vec<_>>(), vec![e2.id]);
        assert!(store.get_exercise(e2.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn title_finder_covers_defaults_and_own_customs_only() {
        let store = MemoryStore::new();
        store.insert_body_part("Core").await.unwrap();
        store
            .insert_exercise(new_exercise("Plank", Ownership::Default, &[1]))
            .await
            .unwrap();
        store
            .insert_exercise(new_exercise("Plank", Ownership::Custom { owner_id: 1 }, &[1]))
            .await
            .unwrap();
        store
            .insert_exercise(new_exercise("Plank", Ownership::Custom { owner_id: 2 }, &[1]))
            .await
            .unwrap();

        let for_user_1 = store.find_exercises_by_title("Plank", Some(1)).await.unwrap();
        assert_eq!(for_user_1.len(), 2);

        let defaults_only = store.find_exercises_by_title("Plank", None).await.unwrap();
        assert_eq!(defaults_only.len(), 1);
    }

    #[tokio::test]
    async fn listing_filters_by_body_part_subset() {
        let store = MemoryStore::new();
        for name in ["Chest", "Back", "Legs"] {
            store.insert_body_part(name).await.unwrap();
        }
        store
            .insert_exercise(new_exercise("Bench", Ownership::Default, &[1]))
            .await
            .unwrap();
        store
            .insert_exercise(new_exercise("Row", Ownership::Default, &[2]))
            .await
            .unwrap();
        store
            .insert_exercise(new_exercise("Squat", Ownership::Default, &[3]))
            .await
            .unwrap();

        let mut q = ResourceQuery::new(VisibilityScope::Default, None);
        q.child_ids = Some(vec![1, 2]);
        let page = store.list_exercises(&q).await.unwrap();
        let titles: Vec<&str> = page.items.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Bench", "Row"]);
    }

    #[tokio::test]
    async fn listing_sorts_descending_with_id_tiebreak() {
        let store = MemoryStore::new();
        store.insert_body_part("Core").await.unwrap();
        for title in ["A", "B", "B", "C"] {
            store
                .insert_exercise(new_exercise(title, Ownership::Default, &[1]))
                .await
                .unwrap();
        }
        let mut q = ResourceQuery::new(VisibilityScope::Default, None);
        q.sort_field = Some("title".into());
        q.sort_direction = SortDirection::Desc;
        let page = store.list_exercises(&q).await.unwrap();
        let order: Vec<(String, i64)> =
            page.items.iter().map(|e| (e.title.clone(), e.id)).collect();
        assert_eq!(
            order,
            vec![("C".into(), 4), ("B".into(), 2), ("B".into(), 3), ("A".into(), 1)]
        );
    }
}
