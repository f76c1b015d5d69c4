mod common;

use axum::http::StatusCode;
use serde_json::json;

async fn create_activity(app: &common::TestApp, user: i64, title: &str, type_id: i64) -> i64 {
    let (status, body) = app
        .post(
            "/api/v1/mental-activities",
            user,
            json!({ "title": title, "mentalTypeId": type_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn mental_types_are_seeded_and_listable() {
    let app = common::spawn().await;
    let (status, body) = app.get("/api/v1/mental-types", 1).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Meditation", "Affirmation", "Breathing"]);
}

#[tokio::test]
async fn activities_embed_their_mental_type() {
    let app = common::spawn().await;
    let id = create_activity(&app, 1, "Box Breathing", 3).await;
    let (_, body) = app.get(&format!("/api/v1/mental-activities/{id}"), 1).await;
    assert_eq!(body["mentalType"]["name"], "Breathing");
}

#[tokio::test]
async fn unknown_mental_type_fails_with_its_id() {
    let app = common::spawn().await;
    let (status, body) = app
        .post(
            "/api/v1/mental-activities",
            1,
            json!({ "title": "Box Breathing", "mentalTypeId": 99 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "CHILD_NOT_FOUND");
    assert!(body["message"].as_str().unwrap().contains("99"));
}

#[tokio::test]
async fn changing_the_mental_type_must_change_it() {
    let app = common::spawn().await;
    let id = create_activity(&app, 1, "Box Breathing", 3).await;
    let path = format!("/api/v1/mental-activities/{id}");

    let (status, body) = app.put(&path, 1, json!({ "mentalTypeId": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "FIELD_NOT_DIFFERENT");
    assert!(body["message"].as_str().unwrap().contains("mentalTypeId"));

    let (status, body) = app.put(&path, 1, json!({ "mentalTypeId": 1 })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mentalType"]["id"], 1);
}

#[tokio::test]
async fn mental_workouts_compose_activities_with_isolation() {
    let app = common::spawn().await;
    let mine = create_activity(&app, 1, "Morning Meditation", 1).await;
    let theirs = create_activity(&app, 2, "Evening Meditation", 1).await;

    let (status, body) = app
        .post(
            "/api/v1/mental-workouts",
            1,
            json!({ "title": "Wind Down", "mentalActivityIds": [mine, theirs] }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "OWNERSHIP_MISMATCH");

    let (status, body) = app
        .post(
            "/api/v1/mental-workouts",
            1,
            json!({ "title": "Wind Down", "mentalActivityIds": [mine] }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(common::ids_of(&body["mentalActivities"]), vec![mine]);
}

#[tokio::test]
async fn mental_workout_updates_replace_the_activity_set() {
    let app = common::spawn().await;
    let a = create_activity(&app, 1, "Morning Meditation", 1).await;
    let b = create_activity(&app, 1, "Affirmations", 2).await;
    let (_, created) = app
        .post(
            "/api/v1/mental-workouts",
            1,
            json!({ "title": "Routine", "mentalActivityIds": [a] }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    let (status, body) = app
        .put(
            &format!("/api/v1/mental-workouts/{id}"),
            1,
            json!({ "mentalActivityIds": [b] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(common::ids_of(&body["mentalActivities"]), vec![b]);

    // An empty list clears the association entirely.
    let (status, body) = app
        .put(
            &format!("/api/v1/mental-workouts/{id}"),
            1,
            json!({ "mentalActivityIds": [] }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(common::ids_of(&body["mentalActivities"]).is_empty());
}

#[tokio::test]
async fn deleting_an_activity_detaches_it_from_mental_workouts() {
    let app = common::spawn().await;
    let a = create_activity(&app, 1, "Morning Meditation", 1).await;
    let b = create_activity(&app, 1, "Affirmations", 2).await;
    let (_, created) = app
        .post(
            "/api/v1/mental-workouts",
            1,
            json!({ "title": "Routine", "mentalActivityIds": [a, b] }),
        )
        .await;
    let id = created["id"].as_i64().unwrap();

    app.delete(&format!("/api/v1/mental-activities/{a}"), 1).await;
    let (_, body) = app.get(&format!("/api/v1/mental-workouts/{id}"), 1).await;
    assert_eq!(common::ids_of(&body["mentalActivities"]), vec![b]);
}
