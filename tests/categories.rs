mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{assert_error, category, ids, question, TestApp};

#[tokio::test]
async fn categories_are_keyed_by_id() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/categories").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "success": true,
            "categories": {
                "1": "Science",
                "2": "Art",
                "3": "Geography",
                "4": "History",
                "5": "Entertainment",
                "6": "Sports"
            }
        })
    );
}

#[tokio::test]
async fn no_categories_is_not_found() {
    let app = TestApp::empty().await;
    assert_error(app.get("/categories").await, 404, "resource not found");
}

#[tokio::test]
async fn questions_of_one_category() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/categories/6/questions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(ids(&body), vec![10, 11]);
    assert_eq!(body["total_questions"], 2);
    assert_eq!(body["category"], 6);
    assert_eq!(body["current_category"], "Sports");
}

#[tokio::test]
async fn unknown_category_is_not_found() {
    let app = TestApp::seeded().await;
    assert_error(app.get("/categories/100/questions").await, 404, "resource not found");
    assert_error(app.get("/categories/art/questions").await, 404, "resource not found");
}

#[tokio::test]
async fn category_without_questions_is_not_found() {
    let app = TestApp::seeded().await;
    app.insert(vec![category(7, "Music")], vec![]).await;
    assert_error(app.get("/categories/7/questions").await, 404, "resource not found");
}

#[tokio::test]
async fn category_questions_are_paginated() {
    let app = TestApp::empty().await;
    app.insert(
        vec![category(1, "Science"), category(2, "Art")],
        (1..=25)
            .map(|id| question(id, "Which one?", if id % 2 == 0 { 2 } else { 1 }))
            .collect(),
    )
    .await;

    let (_, first) = app.get("/categories/1/questions").await;
    assert_eq!(first["total_questions"], 13);
    assert_eq!(ids(&first).len(), 10);

    let (_, second) = app.get("/categories/1/questions?page=2").await;
    assert_eq!(ids(&second), vec![21, 23, 25]);

    assert_error(
        app.get("/categories/1/questions?page=3").await,
        404,
        "resource not found",
    );
}

#[tokio::test]
async fn unknown_route_uses_the_envelope() {
    let app = TestApp::seeded().await;
    assert_error(app.get("/api/v1/categories").await, 404, "resource not found");
}

#[tokio::test]
async fn cors_preflight_allows_any_origin() {
    let app = TestApp::seeded().await;
    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/questions")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "DELETE")
        .body(Body::empty())
        .unwrap();

    let response = app.router.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    let methods = response.headers()[header::ACCESS_CONTROL_ALLOW_METHODS]
        .to_str()
        .unwrap()
        .to_owned();
    assert!(methods.contains("DELETE"));
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = TestApp::seeded().await;
    let (status, _) = app
        .post(
            "/quizzes",
            json!({"previous_questions": [], "quiz_category": {"id": 0}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .uri("/metrics")
        .body(Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(text.contains("trivia_quiz_questions_served_total"));
}
