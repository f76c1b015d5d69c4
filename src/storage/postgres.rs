//! Postgres store. Many-to-many association sets live in junction tables;
//! every mutation runs inside one transaction. Queries are bound at runtime
//! so the crate builds without a live database.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Executor, FromRow, Postgres, QueryBuilder, Row, Transaction};

use crate::models::{
    BodyPart, Exercise, HttpRef, MentalActivity, MentalType, MentalWorkout, NewExercise,
    NewHttpRef, NewMentalActivity, NewMentalWorkout, NewWorkout, Ownership, User, Workout,
};
use crate::query::{Page, ResourceQuery, SortDirection, VisibilityScope};

use super::{Store, StoreError};

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self { pool })
    }

    /// Apply the schema. Idempotent.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        self.pool.execute(include_str!("schema.sql")).await?;
        Ok(())
    }

    /// Seeding path for the shared default lookups.
    pub async fn seed_defaults(&self) -> Result<(), StoreError> {
        for name in ["Chest", "Back", "Shoulders", "Arms", "Core", "Legs"] {
            sqlx::query("INSERT INTO body_parts (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
                .bind(name)
                .execute(&self.pool)
                .await?;
        }
        for name in ["Meditation", "Affirmation", "Breathing"] {
            sqlx::query(
                "INSERT INTO mental_types (name) VALUES ($1) ON CONFLICT (name) DO NOTHING",
            )
            .bind(name)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}

fn ownership_of(is_custom: bool, user_id: Option<i64>) -> Ownership {
    match (is_custom, user_id) {
        (true, Some(owner_id)) => Ownership::Custom { owner_id },
        _ => Ownership::Default,
    }
}

fn sort_column(field: Option<&str>) -> &'static str {
    // Fields were validated against the per-resource allow-list upstream;
    // anything unexpected falls back to the id ordering.
    match field {
        Some("title") => "title",
        Some("name") => "name",
        Some("description") => "description",
        Some("needsEquipment") => "needs_equipment",
        _ => "id",
    }
}

fn direction_sql(direction: SortDirection) -> &'static str {
    match direction {
        SortDirection::Asc => " ASC",
        SortDirection::Desc => " DESC",
    }
}

/// Shape of one listable table, for the shared predicate builder.
struct ListSpec {
    table: &'static str,
    title_col: &'static str,
    filter_needs_equipment: bool,
    /// `(junction table, parent column, child column)` backing the
    /// child-id-subset filter.
    child_link: Option<(&'static str, &'static str, &'static str)>,
}

fn push_predicates(qb: &mut QueryBuilder<'_, Postgres>, spec: &ListSpec, q: &ResourceQuery) {
    qb.push(" WHERE TRUE");
    match (q.scope, q.owner_id) {
        (VisibilityScope::Default, _) => {
            qb.push(" AND is_custom = FALSE");
        }
        (VisibilityScope::Custom, Some(owner)) => {
            qb.push(" AND is_custom = TRUE AND user_id = ");
            qb.push_bind(owner);
        }
        (VisibilityScope::Both, Some(owner)) => {
            qb.push(" AND (is_custom = FALSE OR user_id = ");
            qb.push_bind(owner);
            qb.push(")");
        }
        // Unreachable after query validation; match nothing rather than leak.
        (_, None) => {
            qb.push(" AND FALSE");
        }
    }
    if let Some(title) = &q.title {
        qb.push(format!(" AND {} LIKE ", spec.title_col));
        qb.push_bind(format!("%{}%", title));
    }
    if let Some(description) = &q.description {
        qb.push(" AND description LIKE ");
        qb.push_bind(format!("%{}%", description));
    }
    if spec.filter_needs_equipment {
        if let Some(flag) = q.needs_equipment {
            qb.push(" AND needs_equipment = ");
            qb.push_bind(flag);
        }
    }
    if let (Some((junction, parent_col, child_col)), Some(ids)) =
        (spec.child_link, q.child_ids.as_ref())
    {
        qb.push(format!(
            " AND id IN (SELECT {} FROM {} WHERE {} = ANY(",
            parent_col, junction, child_col
        ));
        qb.push_bind(ids.clone());
        qb.push("))");
    }
}

async fn count_rows(pool: &PgPool, spec: &ListSpec, q: &ResourceQuery) -> Result<u64, StoreError> {
    let mut qb = QueryBuilder::new(format!("SELECT COUNT(*) FROM {}", spec.table));
    push_predicates(&mut qb, spec, q);
    let count: i64 = qb.build_query_scalar().fetch_one(pool).await?;
    Ok(count as u64)
}

fn push_page_tail(qb: &mut QueryBuilder<'_, Postgres>, q: &ResourceQuery) {
    qb.push(" ORDER BY ");
    qb.push(sort_column(q.sort_field.as_deref()));
    qb.push(direction_sql(q.sort_direction));
    qb.push(", id ASC LIMIT ");
    qb.push_bind(q.size as i64);
    qb.push(" OFFSET ");
    qb.push_bind(q.page as i64 * q.size as i64);
}

fn page_from<T>(items: Vec<T>, q: &ResourceQuery, total_elements: u64) -> Page<T> {
    let total_pages = if q.size == 0 {
        0
    } else {
        ((total_elements + q.size as u64 - 1) / q.size as u64) as u32
    };
    Page { items, page: q.page, size: q.size, total_elements, total_pages }
}

/// Load `parent id -> child id set` for one junction table.
async fn load_links(
    pool: &PgPool,
    junction: &str,
    parent_col: &str,
    child_col: &str,
    parent_ids: &[i64],
) -> Result<HashMap<i64, BTreeSet<i64>>, StoreError> {
    if parent_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let sql = format!(
        "SELECT {}, {} FROM {} WHERE {} = ANY($1)",
        parent_col, child_col, junction, parent_col
    );
    let rows = sqlx::query(&sql).bind(parent_ids).fetch_all(pool).await?;
    let mut links: HashMap<i64, BTreeSet<i64>> = HashMap::new();
    for row in rows {
        let parent: i64 = row.try_get(0)?;
        let child: i64 = row.try_get(1)?;
        links.entry(parent).or_default().insert(child);
    }
    Ok(links)
}

async fn insert_links(
    tx: &mut Transaction<'_, Postgres>,
    junction: &str,
    parent_col: &str,
    child_col: &str,
    parent_id: i64,
    child_ids: &BTreeSet<i64>,
) -> Result<(), StoreError> {
    let sql = format!(
        "INSERT INTO {} ({}, {}) VALUES ($1, $2)",
        junction, parent_col, child_col
    );
    for child_id in child_ids {
        sqlx::query(&sql)
            .bind(parent_id)
            .bind(child_id)
            .execute(&mut **tx)
            .await?;
    }
    Ok(())
}

/// Wholesale replacement of a parent's association rows.
async fn replace_links(
    tx: &mut Transaction<'_, Postgres>,
    junction: &str,
    parent_col: &str,
    child_col: &str,
    parent_id: i64,
    child_ids: &BTreeSet<i64>,
) -> Result<(), StoreError> {
    sqlx::query(&format!("DELETE FROM {} WHERE {} = $1", junction, parent_col))
        .bind(parent_id)
        .execute(&mut **tx)
        .await?;
    insert_links(tx, junction, parent_col, child_col, parent_id, child_ids).await
}

async fn delete_row(pool: &PgPool, table: &str, id: i64) -> Result<(), StoreError> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", table))
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound);
    }
    Ok(())
}

#[derive(FromRow)]
struct HttpRefRow {
    id: i64,
    name: String,
    #[sqlx(rename = "ref")]
    url: String,
    description: Option<String>,
    is_custom: bool,
    user_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<HttpRefRow> for HttpRef {
    fn from(row: HttpRefRow) -> Self {
        HttpRef {
            id: row.id,
            name: row.name,
            url: row.url,
            description: row.description,
            ownership: ownership_of(row.is_custom, row.user_id),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct ExerciseRow {
    id: i64,
    title: String,
    description: Option<String>,
    needs_equipment: bool,
    is_custom: bool,
    user_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ExerciseRow {
    fn into_model(self, body_part_ids: BTreeSet<i64>, http_ref_ids: BTreeSet<i64>) -> Exercise {
        Exercise {
            id: self.id,
            title: self.title,
            description: self.description,
            needs_equipment: self.needs_equipment,
            ownership: ownership_of(self.is_custom, self.user_id),
            body_part_ids,
            http_ref_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct WorkoutRow {
    id: i64,
    title: String,
    description: Option<String>,
    is_custom: bool,
    user_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl WorkoutRow {
    fn into_workout(self, exercise_ids: BTreeSet<i64>) -> Workout {
        Workout {
            id: self.id,
            title: self.title,
            description: self.description,
            ownership: ownership_of(self.is_custom, self.user_id),
            exercise_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    fn into_mental_workout(self, mental_activity_ids: BTreeSet<i64>) -> MentalWorkout {
        MentalWorkout {
            id: self.id,
            title: self.title,
            description: self.description,
            ownership: ownership_of(self.is_custom, self.user_id),
            mental_activity_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(FromRow)]
struct MentalActivityRow {
    id: i64,
    title: String,
    description: Option<String>,
    mental_type_id: i64,
    is_custom: bool,
    user_id: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl MentalActivityRow {
    fn into_model(self, http_ref_ids: BTreeSet<i64>) -> MentalActivity {
        MentalActivity {
            id: self.id,
            title: self.title,
            description: self.description,
            mental_type_id: self.mental_type_id,
            ownership: ownership_of(self.is_custom, self.user_id),
            http_ref_ids,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

impl PgStore {
    async fn exercises_from_rows(
        &self,
        rows: Vec<ExerciseRow>,
    ) -> Result<Vec<Exercise>, StoreError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut body_parts =
            load_links(&self.pool, "exercise_body_parts", "exercise_id", "body_part_id", &ids)
                .await?;
        let mut http_refs =
            load_links(&self.pool, "exercise_http_refs", "exercise_id", "http_ref_id", &ids)
                .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let bp = body_parts.remove(&r.id).unwrap_or_default();
                let hr = http_refs.remove(&r.id).unwrap_or_default();
                r.into_model(bp, hr)
            })
            .collect())
    }

    async fn workouts_from_rows(&self, rows: Vec<WorkoutRow>) -> Result<Vec<Workout>, StoreError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut links =
            load_links(&self.pool, "workout_exercises", "workout_id", "exercise_id", &ids).await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let ex = links.remove(&r.id).unwrap_or_default();
                r.into_workout(ex)
            })
            .collect())
    }

    async fn mental_activities_from_rows(
        &self,
        rows: Vec<MentalActivityRow>,
    ) -> Result<Vec<MentalActivity>, StoreError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut links = load_links(
            &self.pool,
            "mental_activity_http_refs",
            "mental_activity_id",
            "http_ref_id",
            &ids,
        )
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let refs = links.remove(&r.id).unwrap_or_default();
                r.into_model(refs)
            })
            .collect())
    }

    async fn mental_workouts_from_rows(
        &self,
        rows: Vec<WorkoutRow>,
    ) -> Result<Vec<MentalWorkout>, StoreError> {
        let ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let mut links = load_links(
            &self.pool,
            "mental_workout_activities",
            "mental_workout_id",
            "mental_activity_id",
            &ids,
        )
        .await?;
        Ok(rows
            .into_iter()
            .map(|r| {
                let activities = links.remove(&r.id).unwrap_or_default();
                r.into_mental_workout(activities)
            })
            .collect())
    }
}

#[async_trait]
impl Store for PgStore {
    async fn insert_user(&self, username: &str, email: &str) -> Result<User, StoreError> {
        let (id, username, email): (i64, String, String) = sqlx::query_as(
            "INSERT INTO users (username, email) VALUES ($1, $2) RETURNING id, username, email",
        )
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(User { id, username, email })
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, StoreError> {
        let row: Option<(i64, String, String)> =
            sqlx::query_as("SELECT id, username, email FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, username, email)| User { id, username, email }))
    }

    async fn insert_body_part(&self, name: &str) -> Result<BodyPart, StoreError> {
        let (id, name): (i64, String) =
            sqlx::query_as("INSERT INTO body_parts (name) VALUES ($1) RETURNING id, name")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(BodyPart { id, name })
    }

    async fn get_body_part(&self, id: i64) -> Result<Option<BodyPart>, StoreError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM body_parts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, name)| BodyPart { id, name }))
    }

    async fn body_parts_by_ids(&self, ids: &[i64]) -> Result<Vec<BodyPart>, StoreError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM body_parts WHERE id = ANY($1) ORDER BY id")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id, name)| BodyPart { id, name }).collect())
    }

    async fn list_body_parts(&self) -> Result<Vec<BodyPart>, StoreError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM body_parts ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id, name)| BodyPart { id, name }).collect())
    }

    async fn insert_mental_type(&self, name: &str) -> Result<MentalType, StoreError> {
        let (id, name): (i64, String) =
            sqlx::query_as("INSERT INTO mental_types (name) VALUES ($1) RETURNING id, name")
                .bind(name)
                .fetch_one(&self.pool)
                .await?;
        Ok(MentalType { id, name })
    }

    async fn get_mental_type(&self, id: i64) -> Result<Option<MentalType>, StoreError> {
        let row: Option<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM mental_types WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(|(id, name)| MentalType { id, name }))
    }

    async fn list_mental_types(&self) -> Result<Vec<MentalType>, StoreError> {
        let rows: Vec<(i64, String)> =
            sqlx::query_as("SELECT id, name FROM mental_types ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(|(id, name)| MentalType { id, name }).collect())
    }

    async fn insert_http_ref(&self, new: NewHttpRef) -> Result<HttpRef, StoreError> {
        let row: HttpRefRow = sqlx::query_as(
            "INSERT INTO http_refs (name, ref, description, is_custom, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&new.name)
        .bind(&new.url)
        .bind(&new.description)
        .bind(new.ownership.is_custom())
        .bind(new.ownership.owner_id())
        .fetch_one(&self.pool)
        .await?;
        Ok(row.into())
    }

    async fn get_http_ref(&self, id: i64) -> Result<Option<HttpRef>, StoreError> {
        let row: Option<HttpRefRow> =
            sqlx::query_as("SELECT * FROM http_refs WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(HttpRef::from))
    }

    async fn http_refs_by_ids(&self, ids: &[i64]) -> Result<Vec<HttpRef>, StoreError> {
        let rows: Vec<HttpRefRow> =
            sqlx::query_as("SELECT * FROM http_refs WHERE id = ANY($1) ORDER BY id")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(HttpRef::from).collect())
    }

    async fn find_http_refs_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<HttpRef>, StoreError> {
        let rows: Vec<HttpRefRow> = sqlx::query_as(
            "SELECT * FROM http_refs WHERE name = $1 AND (is_custom = FALSE OR user_id = $2)",
        )
        .bind(title)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(HttpRef::from).collect())
    }

    async fn update_http_ref(&self, row: HttpRef) -> Result<HttpRef, StoreError> {
        let updated: HttpRefRow = sqlx::query_as(
            "UPDATE http_refs SET name = $1, ref = $2, description = $3, updated_at = now() \
             WHERE id = $4 RETURNING *",
        )
        .bind(&row.name)
        .bind(&row.url)
        .bind(&row.description)
        .bind(row.id)
        .fetch_one(&self.pool)
        .await?;
        Ok(updated.into())
    }

    async fn delete_http_ref(&self, id: i64) -> Result<(), StoreError> {
        // Junction rows cascade, which detaches the ref from its parents
        // without touching them.
        delete_row(&self.pool, "http_refs", id).await
    }

    async fn list_http_refs(&self, query: &ResourceQuery) -> Result<Page<HttpRef>, StoreError> {
        let spec = ListSpec {
            table: "http_refs",
            title_col: "name",
            filter_needs_equipment: false,
            child_link: None,
        };
        let total = count_rows(&self.pool, &spec, query).await?;
        let mut qb = QueryBuilder::new("SELECT * FROM http_refs");
        push_predicates(&mut qb, &spec, query);
        push_page_tail(&mut qb, query);
        let rows: Vec<HttpRefRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        Ok(page_from(rows.into_iter().map(HttpRef::from).collect(), query, total))
    }

    async fn insert_exercise(&self, new: NewExercise) -> Result<Exercise, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row: ExerciseRow = sqlx::query_as(
            "INSERT INTO exercises (title, description, needs_equipment, is_custom, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.needs_equipment)
        .bind(new.ownership.is_custom())
        .bind(new.ownership.owner_id())
        .fetch_one(&mut *tx)
        .await?;
        insert_links(
            &mut tx,
            "exercise_body_parts",
            "exercise_id",
            "body_part_id",
            row.id,
            &new.body_part_ids,
        )
        .await?;
        insert_links(
            &mut tx,
            "exercise_http_refs",
            "exercise_id",
            "http_ref_id",
            row.id,
            &new.http_ref_ids,
        )
        .await?;
        tx.commit().await?;
        Ok(row.into_model(new.body_part_ids, new.http_ref_ids))
    }

    async fn get_exercise(&self, id: i64) -> Result<Option<Exercise>, StoreError> {
        let row: Option<ExerciseRow> =
            sqlx::query_as("SELECT * FROM exercises WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(row) => Ok(self.exercises_from_rows(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn exercises_by_ids(&self, ids: &[i64]) -> Result<Vec<Exercise>, StoreError> {
        let rows: Vec<ExerciseRow> =
            sqlx::query_as("SELECT * FROM exercises WHERE id = ANY($1) ORDER BY id")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        self.exercises_from_rows(rows).await
    }

    async fn find_exercises_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<Exercise>, StoreError> {
        let rows: Vec<ExerciseRow> = sqlx::query_as(
            "SELECT * FROM exercises WHERE title = $1 AND (is_custom = FALSE OR user_id = $2)",
        )
        .bind(title)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        self.exercises_from_rows(rows).await
    }

    async fn update_exercise(&self, row: Exercise) -> Result<Exercise, StoreError> {
        let mut tx = self.pool.begin().await?;
        let updated: ExerciseRow = sqlx::query_as(
            "UPDATE exercises SET title = $1, description = $2, needs_equipment = $3, \
             updated_at = now() WHERE id = $4 RETURNING *",
        )
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.needs_equipment)
        .bind(row.id)
        .fetch_one(&mut *tx)
        .await?;
        replace_links(
            &mut tx,
            "exercise_body_parts",
            "exercise_id",
            "body_part_id",
            row.id,
            &row.body_part_ids,
        )
        .await?;
        replace_links(
            &mut tx,
            "exercise_http_refs",
            "exercise_id",
            "http_ref_id",
            row.id,
            &row.http_ref_ids,
        )
        .await?;
        tx.commit().await?;
        Ok(updated.into_model(row.body_part_ids, row.http_ref_ids))
    }

    async fn delete_exercise(&self, id: i64) -> Result<(), StoreError> {
        delete_row(&self.pool, "exercises", id).await
    }

    async fn list_exercises(&self, query: &ResourceQuery) -> Result<Page<Exercise>, StoreError> {
        let spec = ListSpec {
            table: "exercises",
            title_col: "title",
            filter_needs_equipment: true,
            child_link: Some(("exercise_body_parts", "exercise_id", "body_part_id")),
        };
        let total = count_rows(&self.pool, &spec, query).await?;
        let mut qb = QueryBuilder::new("SELECT * FROM exercises");
        push_predicates(&mut qb, &spec, query);
        push_page_tail(&mut qb, query);
        let rows: Vec<ExerciseRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let items = self.exercises_from_rows(rows).await?;
        Ok(page_from(items, query, total))
    }

    async fn insert_workout(&self, new: NewWorkout) -> Result<Workout, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row: WorkoutRow = sqlx::query_as(
            "INSERT INTO workouts (title, description, is_custom, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.ownership.is_custom())
        .bind(new.ownership.owner_id())
        .fetch_one(&mut *tx)
        .await?;
        insert_links(
            &mut tx,
            "workout_exercises",
            "workout_id",
            "exercise_id",
            row.id,
            &new.exercise_ids,
        )
        .await?;
        tx.commit().await?;
        Ok(row.into_workout(new.exercise_ids))
    }

    async fn get_workout(&self, id: i64) -> Result<Option<Workout>, StoreError> {
        let row: Option<WorkoutRow> =
            sqlx::query_as("SELECT * FROM workouts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(row) => Ok(self.workouts_from_rows(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_workouts_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<Workout>, StoreError> {
        let rows: Vec<WorkoutRow> = sqlx::query_as(
            "SELECT * FROM workouts WHERE title = $1 AND (is_custom = FALSE OR user_id = $2)",
        )
        .bind(title)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        self.workouts_from_rows(rows).await
    }

    async fn update_workout(&self, row: Workout) -> Result<Workout, StoreError> {
        let mut tx = self.pool.begin().await?;
        let updated: WorkoutRow = sqlx::query_as(
            "UPDATE workouts SET title = $1, description = $2, updated_at = now() \
             WHERE id = $3 RETURNING *",
        )
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.id)
        .fetch_one(&mut *tx)
        .await?;
        replace_links(
            &mut tx,
            "workout_exercises",
            "workout_id",
            "exercise_id",
            row.id,
            &row.exercise_ids,
        )
        .await?;
        tx.commit().await?;
        Ok(updated.into_workout(row.exercise_ids))
    }

    async fn delete_workout(&self, id: i64) -> Result<(), StoreError> {
        delete_row(&self.pool, "workouts", id).await
    }

    async fn list_workouts(&self, query: &ResourceQuery) -> Result<Page<Workout>, StoreError> {
        let spec = ListSpec {
            table: "workouts",
            title_col: "title",
            filter_needs_equipment: false,
            child_link: Some(("workout_exercises", "workout_id", "exercise_id")),
        };
        let total = count_rows(&self.pool, &spec, query).await?;
        let mut qb = QueryBuilder::new("SELECT * FROM workouts");
        push_predicates(&mut qb, &spec, query);
        push_page_tail(&mut qb, query);
        let rows: Vec<WorkoutRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let items = self.workouts_from_rows(rows).await?;
        Ok(page_from(items, query, total))
    }

    async fn insert_mental_activity(
        &self,
        new: NewMentalActivity,
    ) -> Result<MentalActivity, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row: MentalActivityRow = sqlx::query_as(
            "INSERT INTO mental_activities \
             (title, description, mental_type_id, is_custom, user_id) \
             VALUES ($1, $2, $3, $4, $5) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.mental_type_id)
        .bind(new.ownership.is_custom())
        .bind(new.ownership.owner_id())
        .fetch_one(&mut *tx)
        .await?;
        insert_links(
            &mut tx,
            "mental_activity_http_refs",
            "mental_activity_id",
            "http_ref_id",
            row.id,
            &new.http_ref_ids,
        )
        .await?;
        tx.commit().await?;
        Ok(row.into_model(new.http_ref_ids))
    }

    async fn get_mental_activity(&self, id: i64) -> Result<Option<MentalActivity>, StoreError> {
        let row: Option<MentalActivityRow> =
            sqlx::query_as("SELECT * FROM mental_activities WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(row) => Ok(self.mental_activities_from_rows(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn mental_activities_by_ids(
        &self,
        ids: &[i64],
    ) -> Result<Vec<MentalActivity>, StoreError> {
        let rows: Vec<MentalActivityRow> =
            sqlx::query_as("SELECT * FROM mental_activities WHERE id = ANY($1) ORDER BY id")
                .bind(ids)
                .fetch_all(&self.pool)
                .await?;
        self.mental_activities_from_rows(rows).await
    }

    async fn find_mental_activities_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<MentalActivity>, StoreError> {
        let rows: Vec<MentalActivityRow> = sqlx::query_as(
            "SELECT * FROM mental_activities \
             WHERE title = $1 AND (is_custom = FALSE OR user_id = $2)",
        )
        .bind(title)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        self.mental_activities_from_rows(rows).await
    }

    async fn update_mental_activity(
        &self,
        row: MentalActivity,
    ) -> Result<MentalActivity, StoreError> {
        let mut tx = self.pool.begin().await?;
        let updated: MentalActivityRow = sqlx::query_as(
            "UPDATE mental_activities SET title = $1, description = $2, mental_type_id = $3, \
             updated_at = now() WHERE id = $4 RETURNING *",
        )
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.mental_type_id)
        .bind(row.id)
        .fetch_one(&mut *tx)
        .await?;
        replace_links(
            &mut tx,
            "mental_activity_http_refs",
            "mental_activity_id",
            "http_ref_id",
            row.id,
            &row.http_ref_ids,
        )
        .await?;
        tx.commit().await?;
        Ok(updated.into_model(row.http_ref_ids))
    }

    async fn delete_mental_activity(&self, id: i64) -> Result<(), StoreError> {
        delete_row(&self.pool, "mental_activities", id).await
    }

    async fn list_mental_activities(
        &self,
        query: &ResourceQuery,
    ) -> Result<Page<MentalActivity>, StoreError> {
        let spec = ListSpec {
            table: "mental_activities",
            title_col: "title",
            filter_needs_equipment: false,
            child_link: Some(("mental_activity_http_refs", "mental_activity_id", "http_ref_id")),
        };
        let total = count_rows(&self.pool, &spec, query).await?;
        let mut qb = QueryBuilder::new("SELECT * FROM mental_activities");
        push_predicates(&mut qb, &spec, query);
        push_page_tail(&mut qb, query);
        let rows: Vec<MentalActivityRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let items = self.mental_activities_from_rows(rows).await?;
        Ok(page_from(items, query, total))
    }

    async fn insert_mental_workout(
        &self,
        new: NewMentalWorkout,
    ) -> Result<MentalWorkout, StoreError> {
        let mut tx = self.pool.begin().await?;
        let row: WorkoutRow = sqlx::query_as(
            "INSERT INTO mental_workouts (title, description, is_custom, user_id) \
             VALUES ($1, $2, $3, $4) RETURNING *",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(new.ownership.is_custom())
        .bind(new.ownership.owner_id())
        .fetch_one(&mut *tx)
        .await?;
        insert_links(
            &mut tx,
            "mental_workout_activities",
            "mental_workout_id",
            "mental_activity_id",
            row.id,
            &new.mental_activity_ids,
        )
        .await?;
        tx.commit().await?;
        Ok(row.into_mental_workout(new.mental_activity_ids))
    }

    async fn get_mental_workout(&self, id: i64) -> Result<Option<MentalWorkout>, StoreError> {
        let row: Option<WorkoutRow> =
            sqlx::query_as("SELECT * FROM mental_workouts WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        match row {
            Some(row) => Ok(self.mental_workouts_from_rows(vec![row]).await?.pop()),
            None => Ok(None),
        }
    }

    async fn find_mental_workouts_by_title(
        &self,
        title: &str,
        owner_id: Option<i64>,
    ) -> Result<Vec<MentalWorkout>, StoreError> {
        let rows: Vec<WorkoutRow> = sqlx::query_as(
            "SELECT * FROM mental_workouts \
             WHERE title = $1 AND (is_custom = FALSE OR user_id = $2)",
        )
        .bind(title)
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        self.mental_workouts_from_rows(rows).await
    }

    async fn update_mental_workout(
        &self,
        row: MentalWorkout,
    ) -> Result<MentalWorkout, StoreError> {
        let mut tx = self.pool.begin().await?;
        let updated: WorkoutRow = sqlx::query_as(
            "UPDATE mental_workouts SET title = $1, description = $2, updated_at = now() \
             WHERE id = $3 RETURNING *",
        )
        .bind(&row.title)
        .bind(&row.description)
        .bind(row.id)
        .fetch_one(&mut *tx)
        .await?;
        replace_links(
            &mut tx,
            "mental_workout_activities",
            "mental_workout_id",
            "mental_activity_id",
            row.id,
            &row.mental_activity_ids,
        )
        .await?;
        tx.commit().await?;
        Ok(updated.into_mental_workout(row.mental_activity_ids))
    }

    async fn delete_mental_workout(&self, id: i64) -> Result<(), StoreError> {
        delete_row(&self.pool, "mental_workouts", id).await
    }

    async fn list_mental_workouts(
        &self,
        query: &ResourceQuery,
    ) -> Result<Page<MentalWorkout>, StoreError> {
        let spec = ListSpec {
            table: "mental_workouts",
            title_col: "title",
            filter_needs_equipment: false,
            child_link: Some(("mental_workout_activities", "mental_workout_id", "mental_activity_id")),
        };
        let total = count_rows(&self.pool, &spec, query).await?;
        let mut qb = QueryBuilder::new("SELECT * FROM mental_workouts");
        push_predicates(&mut qb, &spec, query);
        push_page_tail(&mut qb, query);
        let rows: Vec<WorkoutRow> = qb.build_query_as().fetch_all(&self.pool).await?;
        let items = self.mental_workouts_from_rows(rows).await?;
        Ok(page_from(items, query, total))
    }
}
