//! Video writes and the persisted priority score.

mod common;

use axum::http::{Method, StatusCode};
use common::{build_test_app, delete, expect_data, get, post_json, put_json, send, test_store};
use serde_json::{json, Value};

async fn seed_channel(app: axum::Router, monetized: bool) {
    let response = post_json(
        app,
        "/api/v1/channels",
        json!({
            "id": "c1",
            "name": "Rust Daily",
            "growthPotential": 8,
            "productionEase": 6,
            "isMonetized": monetized
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn create_video(app: axum::Router, body: Value) -> Value {
    expect_data(post_json(app, "/api/v1/videos", body).await, StatusCode::CREATED).await
}

#[tokio::test]
async fn new_video_scores_from_channel() {
    let app = build_test_app(test_store());
    seed_channel(app.clone(), false).await;

    let video = create_video(app, json!({"channelId": "c1", "title": "Ownership"})).await;
    assert_eq!(video["priorityScore"], 48.0);
    assert_eq!(video["status"], "Idea");
}

#[tokio::test]
async fn monetized_channel_uses_write_bonus() {
    let app = build_test_app(test_store());
    seed_channel(app.clone(), true).await;

    let video = create_video(app, json!({"channelId": "c1", "title": "Ownership"})).await;
    assert_eq!(video["priorityScore"], 58.0);
}

#[tokio::test]
async fn video_without_channel_scores_zero() {
    let app = build_test_app(test_store());

    let video = create_video(app, json!({"channelId": "missing", "title": "Orphan"})).await;
    assert_eq!(video["priorityScore"], 0.0);
}

#[tokio::test]
async fn client_supplied_score_is_overwritten() {
    let app = build_test_app(test_store());
    seed_channel(app.clone(), false).await;

    let video = create_video(
        app,
        json!({"channelId": "c1", "title": "Traits", "priorityScore": 999}),
    )
    .await;
    assert_eq!(video["priorityScore"], 48.0);
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let app = build_test_app(test_store());

    let response = post_json(app, "/api/v1/videos", json!({"channelId": "c1", "title": ""})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn channel_edit_leaves_cached_score_stale_until_resave() {
    let app = build_test_app(test_store());
    seed_channel(app.clone(), false).await;
    let video = create_video(app.clone(), json!({"id": "v1", "channelId": "c1", "title": "Macros"})).await;
    assert_eq!(video["priorityScore"], 48.0);

    put_json(
        app.clone(),
        "/api/v1/channels/c1",
        json!({"name": "Rust Daily", "growthPotential": 2, "productionEase": 3}),
    )
    .await;

    let stale = expect_data(get(app.clone(), "/api/v1/videos/v1").await, StatusCode::OK).await;
    assert_eq!(stale["priorityScore"], 48.0);

    let resaved = expect_data(
        put_json(app, "/api/v1/videos/v1", json!({"channelId": "c1", "title": "Macros"})).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(resaved["priorityScore"], 6.0);
}

#[tokio::test]
async fn update_after_channel_deletion_keeps_cached_score() {
    let app = build_test_app(test_store());
    seed_channel(app.clone(), false).await;
    create_video(app.clone(), json!({"id": "v1", "channelId": "c1", "title": "Unsafe"})).await;

    delete(app.clone(), "/api/v1/channels/c1").await;

    let updated = expect_data(
        put_json(
            app,
            "/api/v1/videos/v1",
            json!({"channelId": "c1", "title": "Unsafe Rust", "status": "Filming"}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["title"], "Unsafe Rust");
    assert_eq!(updated["status"], "Filming");
    assert_eq!(updated["priorityScore"], 48.0);
}

#[tokio::test]
async fn advance_walks_to_published_and_stops() {
    let app = build_test_app(test_store());
    seed_channel(app.clone(), false).await;
    create_video(app.clone(), json!({"id": "v1", "channelId": "c1", "title": "Pinning"})).await;

    let expected = ["Scripting", "Filming", "Editing", "Scheduled", "Published", "Published"];
    let mut completion = Value::Null;
    for status in expected {
        let video = expect_data(
            send(app.clone(), Method::POST, "/api/v1/videos/v1/advance", None).await,
            StatusCode::OK,
        )
        .await;
        assert_eq!(video["status"], status);

        if status == "Published" {
            assert!(video["completionDate"].is_i64());
            if completion.is_null() {
                completion = video["completionDate"].clone();
            } else {
                assert_eq!(video["completionDate"], completion);
            }
        } else {
            assert!(video["completionDate"].is_null());
        }
    }
}

#[tokio::test]
async fn status_can_move_backwards() {
    let app = build_test_app(test_store());
    create_video(
        app.clone(),
        json!({"id": "v1", "channelId": "c1", "title": "Iterators", "status": "Scheduled"}),
    )
    .await;

    let video = expect_data(
        put_json(
            app,
            "/api/v1/videos/v1",
            json!({"channelId": "c1", "title": "Iterators", "status": "Idea"}),
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(video["status"], "Idea");
}

#[tokio::test]
async fn complete_marks_published_with_timestamp() {
    let app = build_test_app(test_store());
    create_video(app.clone(), json!({"id": "v1", "channelId": "c1", "title": "Closures"})).await;

    let video = expect_data(
        send(app, Method::POST, "/api/v1/videos/v1/complete", None).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(video["status"], "Published");
    assert!(video["completionDate"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn list_is_filtered_and_priority_ordered() {
    let app = build_test_app(test_store());
    post_json(
        app.clone(),
        "/api/v1/channels",
        json!({"id": "low", "name": "Low", "growthPotential": 1, "productionEase": 2}),
    )
    .await;
    post_json(
        app.clone(),
        "/api/v1/channels",
        json!({"id": "high", "name": "High", "growthPotential": 9, "productionEase": 9}),
    )
    .await;
    create_video(app.clone(), json!({"id": "a", "channelId": "low", "title": "A"})).await;
    create_video(app.clone(), json!({"id": "b", "channelId": "high", "title": "B"})).await;
    create_video(app.clone(), json!({"id": "c", "channelId": "low", "title": "C"})).await;

    let all = expect_data(get(app.clone(), "/api/v1/videos").await, StatusCode::OK).await;
    let ids: Vec<&str> = all.as_array().unwrap().iter().map(|v| v["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["b", "a", "c"]);

    let low = expect_data(get(app, "/api/v1/videos?channelId=low").await, StatusCode::OK).await;
    assert_eq!(low.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn delete_removes_video() {
    let app = build_test_app(test_store());
    create_video(app.clone(), json!({"id": "v1", "channelId": "c1", "title": "Drop"})).await;

    assert_eq!(delete(app.clone(), "/api/v1/videos/v1").await.status(), StatusCode::OK);
    assert_eq!(get(app.clone(), "/api/v1/videos/v1").await.status(), StatusCode::NOT_FOUND);
    assert_eq!(delete(app, "/api/v1/videos/v1").await.status(), StatusCode::NOT_FOUND);
}
