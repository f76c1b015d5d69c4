mod common;

use axum::http::StatusCode;
use serde_json::json;

#[tokio::test]
async fn the_url_travels_under_the_ref_key() {
    let app = common::spawn().await;
    let (status, body) = app
        .post(
            "/api/v1/http-refs",
            1,
            json!({ "name": "Form guide", "ref": "https://example.org/guide" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ref"], "https://example.org/guide");
    assert!(body.get("url").is_none());
}

#[tokio::test]
async fn only_http_and_https_urls_are_accepted() {
    let app = common::spawn().await;
    for bad in ["ftp://example.org/x", "not a url", "javascript:alert(1)"] {
        let (status, body) = app
            .post("/api/v1/http-refs", 1, json!({ "name": "Link", "ref": bad }))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{bad}");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn names_follow_the_duplicate_policy() {
    let app = common::spawn().await;
    app.post(
        "/api/v1/http-refs",
        1,
        json!({ "name": "Form guide", "ref": "https://example.org/a" }),
    )
    .await;

    let (status, body) = app
        .post(
            "/api/v1/http-refs",
            1,
            json!({ "name": "Form guide", "ref": "https://example.org/b" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "TITLE_DUPLICATE");

    let (status, _) = app
        .post(
            "/api/v1/http-refs",
            2,
            json!({ "name": "Form guide", "ref": "https://example.org/b" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn an_unchanged_name_fails_even_when_other_fields_change() {
    let app = common::spawn().await;
    let (_, created) = app
        .post(
            "/api/v1/http-refs",
            1,
            json!({ "name": "Form guide", "ref": "https://example.org/guide" }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    // The description genuinely changes, but the present-but-equal name
    // still fails the request as a whole.
    let (status, body) = app
        .put(
            &format!("/api/v1/http-refs/{id}"),
            1,
            json!({ "name": "Form guide", "description": "Updated notes" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FIELD_NOT_DIFFERENT");
    assert!(body["message"].as_str().unwrap().contains("name"));

    // Nothing was applied.
    let (_, current) = app.get(&format!("/api/v1/http-refs/{id}"), 1).await;
    assert!(current["description"].is_null());
}

#[tokio::test]
async fn deleting_a_ref_detaches_it_from_exercises() {
    let app = common::spawn().await;
    let (_, created) = app
        .post(
            "/api/v1/http-refs",
            1,
            json!({ "name": "Form guide", "ref": "https://example.org/guide" }),
        )
        .await;
    let ref_id = created["id"].as_i64().unwrap();

    let (_, exercise) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({
                "title": "Bench Press",
                "needsEquipment": true,
                "bodyPartIds": [1],
                "httpRefIds": [ref_id],
            }),
        )
        .await;
    let exercise_id = exercise["id"].as_i64().unwrap();
    assert_eq!(common::ids_of(&exercise["httpRefs"]), vec![ref_id]);

    let (status, _) = app.delete(&format!("/api/v1/http-refs/{ref_id}"), 1).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, exercise) = app.get(&format!("/api/v1/exercises/{exercise_id}"), 1).await;
    assert!(common::ids_of(&exercise["httpRefs"]).is_empty());
}

#[tokio::test]
async fn another_users_ref_cannot_be_attached() {
    let app = common::spawn().await;
    let (_, created) = app
        .post(
            "/api/v1/http-refs",
            2,
            json!({ "name": "Form guide", "ref": "https://example.org/guide" }),
        )
        .await;
    let ref_id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .post(
            "/api/v1/exercises",
            1,
            json!({
                "title": "Bench Press",
                "needsEquipment": true,
                "bodyPartIds": [1],
                "httpRefIds": [ref_id],
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "OWNERSHIP_MISMATCH");
}
