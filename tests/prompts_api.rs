mod common;

use axum::http::StatusCode;
use common::{build_test_app, delete, expect_data, get, post_json, test_store};
use serde_json::json;

#[tokio::test]
async fn prompts_are_listed_newest_first() {
    let app = build_test_app(test_store());

    for title in ["Hook ideas", "Thumbnail brief"] {
        let response = post_json(
            app.clone(),
            "/api/v1/prompts",
            json!({"title": title, "content": "...", "category": "Script"}),
        )
        .await;
        expect_data(response, StatusCode::CREATED).await;
    }

    let prompts = expect_data(get(app, "/api/v1/prompts").await, StatusCode::OK).await;
    let titles: Vec<&str> = prompts
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["Thumbnail brief", "Hook ideas"]);
}

#[tokio::test]
async fn prompt_content_is_required() {
    let app = build_test_app(test_store());

    let response = post_json(app, "/api/v1/prompts", json!({"title": "Hooks", "content": "  "})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn blank_title_and_category_are_defaulted() {
    let app = build_test_app(test_store());

    let prompt = expect_data(
        post_json(app, "/api/v1/prompts", json!({"content": "Give me ten hooks"})).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(prompt["title"], "Untitled");
    assert_eq!(prompt["category"], "General");
    assert_eq!(prompt["content"], "Give me ten hooks");
}

#[tokio::test]
async fn deleting_unknown_prompt_is_404() {
    let app = build_test_app(test_store());

    let created = expect_data(
        post_json(app.clone(), "/api/v1/prompts", json!({"id": "p1", "title": "Intro", "content": "Open strong"})).await,
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(created["id"], "p1");

    assert_eq!(delete(app.clone(), "/api/v1/prompts/p1").await.status(), StatusCode::OK);
    assert_eq!(delete(app, "/api/v1/prompts/p1").await.status(), StatusCode::NOT_FOUND);
}
