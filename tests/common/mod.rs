//! Shared harness: an in-memory app instance plus JSON request helpers.
#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use wellness_api::handlers::{app, AppState};
use wellness_api::models::{NewExercise, Ownership};
use wellness_api::storage::{MemoryStore, Store};

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub async fn spawn() -> TestApp {
    let store = Arc::new(MemoryStore::new());
    store.seed_defaults().await.unwrap();
    let dyn_store: Arc<dyn Store> = store.clone();
    TestApp { router: app(AppState::new(dyn_store)), store }
}

impl TestApp {
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        user: Option<i64>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            builder = builder.header("X-User-Id", user.to_string());
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    pub async fn get(&self, path: &str, user: i64) -> (StatusCode, Value) {
        self.request(Method::GET, path, Some(user), None).await
    }

    pub async fn post(&self, path: &str, user: i64, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, path, Some(user), Some(body)).await
    }

    pub async fn put(&self, path: &str, user: i64, body: Value) -> (StatusCode, Value) {
        self.request(Method::PUT, path, Some(user), Some(body)).await
    }

    pub async fn delete(&self, path: &str, user: i64) -> (StatusCode, Value) {
        self.request(Method::DELETE, path, Some(user), None).await
    }

    /// Create a custom exercise through the API and return its id.
    pub async fn create_exercise(
        &self,
        user: i64,
        title: &str,
        needs_equipment: bool,
        body_part_ids: &[i64],
    ) -> i64 {
        let (status, body) = self
            .post(
                "/api/v1/exercises",
                user,
                json!({
                    "title": title,
                    "needsEquipment": needs_equipment,
                    "bodyPartIds": body_part_ids,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create exercise failed: {body}");
        body["id"].as_i64().unwrap()
    }

    /// Seed a default (non-custom) exercise directly in storage; there is no
    /// API path that creates defaults.
    pub async fn seed_default_exercise(
        &self,
        title: &str,
        needs_equipment: bool,
        body_part_ids: &[i64],
    ) -> i64 {
        self.store
            .insert_exercise(NewExercise {
                title: title.to_string(),
                description: None,
                needs_equipment,
                ownership: Ownership::Default,
                body_part_ids: body_part_ids.iter().copied().collect::<BTreeSet<i64>>(),
                http_ref_ids: BTreeSet::new(),
            })
            .await
            .unwrap()
            .id
    }
}

pub fn ids_of(items: &Value) -> Vec<i64> {
    items
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["id"].as_i64().unwrap())
        .collect()
}
