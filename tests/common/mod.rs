#![allow(dead_code)]

use std::path::Path;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tower::ServiceExt;
use trivia_api::db::queries::{categories::import_categories, questions::import_questions};
use trivia_api::db::transfer::import_data;
use trivia_api::db::{run_migrations, Category, Question};
use trivia_api::server::app::{build_router, AppState};

pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn empty() -> TestApp {
        // one connection that never expires, the in-memory database lives as long as it does
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("Cannot open in-memory database");
        run_migrations(&pool).await.expect("Migrations failed");
        TestApp {
            router: build_router(AppState::new(pool.clone())),
            pool,
        }
    }

    /// The bundled trivia set: 6 categories, 19 questions with ids 2..=23.
    pub async fn seeded() -> TestApp {
        let app = Self::empty().await;
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        import_data(&app.pool, &data)
            .await
            .expect("Cannot import seed data");
        app
    }

    pub async fn insert(&self, categories: Vec<Category>, questions: Vec<Question>) {
        let mut conn = self.pool.acquire().await.unwrap();
        import_categories(&mut conn, categories).await.unwrap();
        import_questions(&mut conn, questions).await.unwrap();
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body.to_string())).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn send(&self, method: Method, uri: &str, body: Option<String>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body)),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }
}

pub fn category(id: i64, kind: &str) -> Category {
    Category {
        id,
        kind: kind.to_owned(),
    }
}

pub fn question(id: i64, text: &str, category: i64) -> Question {
    Question {
        id,
        question: text.to_owned(),
        answer: "answer".to_owned(),
        category,
        difficulty: 1,
    }
}

pub fn ids(body: &Value) -> Vec<i64> {
    body["questions"]
        .as_array()
        .expect("questions should be an array")
        .iter()
        .map(|q| q["id"].as_i64().unwrap())
        .collect()
}

pub fn assert_error(response: (StatusCode, Value), code: u16, message: &str) {
    let (status, body) = response;
    assert_eq!(status.as_u16(), code, "unexpected status, body: {body}");
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], code);
    assert_eq!(body["message"], message);
}
