use std::collections::BTreeMap;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    routing::{delete, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_aux::field_attributes::deserialize_number_from_string;
use sqlx::SqlitePool;

use crate::{
    db::{
        queries::{categories::get_all_categories, questions},
        Question,
    },
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
        pagination::{paginate, PageQuery, Pagination},
    },
    telemetry::QUESTION_MUTATIONS,
};

use super::{category_map, non_empty};

// the frontend posts form values, so numbers may arrive as strings
#[derive(Deserialize)]
struct NewQuestion {
    question: String,
    answer: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    category: i64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    difficulty: i64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchBody {
    search_term: String,
}

#[derive(Serialize)]
struct QuestionsPage {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    current_category: &'static str,
    categories: BTreeMap<i64, String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SearchResults {
    success: bool,
    questions: Vec<Question>,
    total_questions: usize,
    #[serde(rename = "current_category")]
    current_category: &'static str,
}

#[derive(Serialize)]
struct Deleted {
    success: bool,
    deleted: i64,
}

#[derive(Serialize)]
struct Created {
    success: bool,
}

async fn list_questions(
    State(pool): State<SqlitePool>,
    PageQuery(Pagination { page }): PageQuery,
) -> ApiResponse<Json<QuestionsPage>> {
    let all = questions::get_all_questions(&pool).await?;
    let current = non_empty(paginate(&all, page).to_vec())?;
    let categories = get_all_categories(&pool).await?;

    Ok(Json(QuestionsPage {
        success: true,
        questions: current,
        total_questions: all.len(),
        current_category: "",
        categories: category_map(categories),
    }))
}

async fn delete_question(
    State(pool): State<SqlitePool>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResponse<Json<Deleted>> {
    let Path(id) = id.map_err(|_| ApiError::NotFound)?;
    let unprocessable = |err: sqlx::Error| {
        tracing::warn!("Unable to delete question {id}: {err}");
        ApiError::Unprocessable
    };
    questions::get_question(&pool, id)
        .await
        .map_err(unprocessable)?
        .ok_or(ApiError::NotFound)?;

    match questions::delete_question(&pool, id).await {
        Ok(true) => {
            tracing::info!("Deleted question {id}");
            QUESTION_MUTATIONS.with_label_values(&["delete"]).inc();
            Ok(Json(Deleted {
                success: true,
                deleted: id,
            }))
        }
        // removed by a concurrent request between the lookup and the delete
        Ok(false) => Err(ApiError::NotFound),
        Err(err) => Err(unprocessable(err)),
    }
}

async fn create_question(
    State(pool): State<SqlitePool>,
    payload: Result<Json<NewQuestion>, JsonRejection>,
) -> ApiResponse<Json<Created>> {
    let Json(new_question) = payload.map_err(|rejection| {
        tracing::debug!("Rejected new question: {rejection}");
        ApiError::Unprocessable
    })?;
    let text = new_question.question.trim();
    let answer = new_question.answer.trim();
    if text.is_empty() || answer.is_empty() {
        return Err(ApiError::Unprocessable);
    }

    let id = questions::create_question(
        &pool,
        text,
        answer,
        new_question.category,
        new_question.difficulty,
    )
    .await
    .map_err(|err| {
        tracing::warn!("Unable to create question: {err}");
        ApiError::Unprocessable
    })?;

    tracing::info!("Created question {id}");
    QUESTION_MUTATIONS.with_label_values(&["create"]).inc();
    Ok(Json(Created { success: true }))
}

async fn search_questions(
    State(pool): State<SqlitePool>,
    PageQuery(Pagination { page }): PageQuery,
    payload: Result<Json<SearchBody>, JsonRejection>,
) -> ApiResponse<Json<SearchResults>> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!("Rejected search: {rejection}");
        ApiError::BadRequest
    })?;
    let term = body.search_term.trim();
    if term.is_empty() {
        return Err(ApiError::BadRequest);
    }

    let found = non_empty(questions::search_questions(&pool, term).await?)?;
    let current = non_empty(paginate(&found, page).to_vec())?;

    Ok(Json(SearchResults {
        success: true,
        questions: current,
        total_questions: found.len(),
        current_category: "",
    }))
}

pub fn questions_router(state: AppState) -> Router {
    Router::new()
        .route("/questions", get(list_questions).post(create_question))
        .route("/questions/search", post(search_questions))
        .route("/questions/{id}", delete(delete_question))
        .with_state(state)
}
