use std::collections::BTreeMap;

use axum::{
    extract::{rejection::PathRejection, Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories, questions::get_questions_for_category},
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
        pagination::{paginate, PageQuery, Pagination},
    },
};

use super::{category_map, non_empty};

#[derive(Serialize)]
struct CategoriesResponse {
    success: bool,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
struct CategoryQuestionsResponse {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: String,
    category: i64,
}

async fn get_categories(State(pool): State<SqlitePool>) -> ApiResponse<Json<CategoriesResponse>> {
    let categories = non_empty(categories::get_all_categories(&pool).await?)?;
    Ok(Json(CategoriesResponse {
        success: true,
        categories: category_map(categories),
    }))
}

async fn get_category_questions(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
    PageQuery(Pagination { page }): PageQuery,
) -> ApiResponse<Json<CategoryQuestionsResponse>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let category = categories::get_category(&pool, id)
        .await?
        .ok_or(ApiError::NotFound)?;
    let questions = non_empty(get_questions_for_category(&pool, id).await?)?;
    let current = non_empty(paginate(&questions, page).to_vec())?;

    Ok(Json(CategoryQuestionsResponse {
        success: true,
        questions: current,
        total_questions: questions.len(),
        current_category: category.kind,
        category: category.id,
    }))
}

pub fn category_router(state: AppState) -> Router {
    Router::new()
        .route("/categories", get(get_categories))
        .route("/categories/{id}/questions", get(get_category_questions))
        .with_state(state)
}
