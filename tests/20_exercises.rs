mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn create_returns_children_ascending_by_id() {
    let app = common::spawn().await;
    let (status, body) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({
                "title": "Bench Press",
                "description": "Flat barbell press",
                "needsEquipment": true,
                "bodyPartIds": [4, 1, 4],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Bench Press");
    assert_eq!(body["isCustom"], true);
    assert_eq!(common::ids_of(&body["bodyParts"]), vec![1, 4]);
}

#[tokio::test]
async fn owner_scoping_on_reads() {
    let app = common::spawn().await;
    let id = app.create_exercise(1, "Bench Press", true, &[1]).await;

    let (status, _) = app.get(&format!("/api/v1/exercises/{id}"), 1).await;
    assert_eq!(status, StatusCode::OK);

    // Another user gets the mismatch error, carrying the id.
    let (status, body) = app.get(&format!("/api/v1/exercises/{id}"), 2).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "OWNERSHIP_MISMATCH");
    assert!(body["message"].as_str().unwrap().contains(&id.to_string()));

    // A custom row through the default endpoint is a variant mismatch.
    let (status, body) = app.get(&format!("/api/v1/exercises/default/{id}"), 1).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "WRONG_VARIANT_REQUESTED");
}

#[tokio::test]
async fn default_rows_are_readable_by_anyone_but_immutable() {
    let app = common::spawn().await;
    let id = app.seed_default_exercise("Push-up", false, &[1, 4]).await;

    let (status, body) = app.get(&format!("/api/v1/exercises/default/{id}"), 42).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isCustom"], false);

    let (status, body) = app
        .put(
            &format!("/api/v1/exercises/{id}"),
            42,
            json!({ "title": "Renamed" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "DEFAULT_RESOURCE_IMMUTABLE");

    let (_, body) = app.delete(&format!("/api/v1/exercises/{id}"), 42).await;
    assert_eq!(body["code"], "DEFAULT_RESOURCE_IMMUTABLE");
}

#[tokio::test]
async fn default_reads_work_without_a_user_header() {
    let app = common::spawn().await;
    let id = app.seed_default_exercise("Push-up", false, &[1]).await;
    let (status, body) = app
        .request(
            axum::http::Method::GET,
            &format!("/api/v1/exercises/default/{id}"),
            None,
            None,
        )
        .await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body["title"], "Push-up");
}

#[tokio::test]
async fn missing_children_fail_fast_with_the_first_id() {
    let app = common::spawn().await;
    let (status, body) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({ "title": "Bench Press", "needsEquipment": false, "bodyPartIds": [1, 99, 98] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CHILD_NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn at_least_one_body_part_is_required() {
    let app = common::spawn().await;
    let (status, body) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({ "title": "Bench Press", "needsEquipment": false, "bodyPartIds": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_REQUIRED_ASSOCIATION");
}

#[tokio::test]
async fn titles_are_unique_per_owner_scope() {
    let app = common::spawn().await;
    app.create_exercise(1, "Bench Press", true, &[1]).await;

    let (status, body) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({ "title": "Bench Press", "needsEquipment": true, "bodyPartIds": [1] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TITLE_DUPLICATE");
    // The message names no id: which row holds the title is not revealed.
    assert!(!body["message"].as_str().unwrap().chars().any(|c| c.is_ascii_digit()));

    // A different user is a different scope.
    let (status, _) = app
        .post(
            "/api/v1/exercises",
            2,
            json!({ "title": "Bench Press", "needsEquipment": true, "bodyPartIds": [1] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn a_custom_title_may_shadow_a_default_title() {
    let app = common::spawn().await;
    app.seed_default_exercise("Plank", false, &[5]).await;
    let (status, body) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({ "title": "Plank", "needsEquipment": false, "bodyPartIds": [5] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["isCustom"], true);

    // The shadow only goes one level: a second custom "Plank" by the same
    // owner is still a duplicate.
    let (status, body) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({ "title": "Plank", "needsEquipment": false, "bodyPartIds": [5] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TITLE_DUPLICATE");
}

#[tokio::test]
async fn update_machine_rejections() {
    let app = common::spawn().await;
    let id = app.create_exercise(1, "Bench Press", true, &[1]).await;
    let path = format!("/api/v1/exercises/{id}");

    let (status, body) = app.put(&path, 1, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "EMPTY_UPDATE_REQUEST");

    let (_, body) = app.put(&path, 1, json!({ "needsEquipment": true })).await;
    assert_eq!(body["code"], "FIELD_NOT_DIFFERENT");
    assert!(body["message"].as_str().unwrap().contains("needsEquipment"));

    let (_, body) = app.put(&path, 1, json!({ "title": "Bench Press" })).await;
    assert!(body["message"].as_str().unwrap().contains("title"));

    let (status, body) = app.put(&path, 1, json!({ "title": "Incline Press" })).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["title"], "Incline Press");
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let app = common::spawn().await;
    let id = app.create_exercise(1, "Bench Press", true, &[1]).await;

    let (status, _) = app.delete(&format!("/api/v1/exercises/{id}"), 1).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app.get(&format!("/api/v1/exercises/{id}"), 1).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains(&id.to_string()));
}

#[tokio::test]
async fn text_fields_are_allow_listed() {
    let app = common::spawn().await;
    let (status, body) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({ "title": "Bench; DROP TABLE", "needsEquipment": false, "bodyPartIds": [1] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["field_errors"]["title"].is_string());
}
