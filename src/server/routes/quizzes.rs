use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use serde::{de, Deserialize, Deserializer, Serialize};
use sqlx::SqlitePool;

use crate::{
    db::{queries::questions, Question},
    server::{
        app::AppState,
        error::{ApiError, ApiResponse},
        quiz::select_next,
    },
    telemetry::QUIZ_QUESTIONS_SERVED,
};

use super::non_empty;

/// Category id meaning "questions from every category".
const ALL_CATEGORIES: i64 = 0;

#[derive(Deserialize)]
struct QuizRequest {
    previous_questions: Vec<i64>,
    quiz_category: QuizCategory,
}

// the frontend also sends the category `type`, which is ignored
#[derive(Deserialize)]
struct QuizCategory {
    #[serde(deserialize_with = "category_id")]
    id: i64,
}

/// Accepts `6`, `6.0` and `"6"`. Fractional ids are rejected.
fn category_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Integer(i64),
        Float(f64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Integer(id) => Ok(id),
        RawId::Float(id) if id.fract() == 0.0 => Ok(id as i64),
        RawId::Float(id) => Err(de::Error::custom(format!("{id} is not a category id"))),
        RawId::Text(id) => id.parse().map_err(de::Error::custom),
    }
}

#[derive(Serialize)]
struct NextQuestion {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    question: Option<Question>,
}

async fn next_question(
    State(pool): State<SqlitePool>,
    payload: Result<Json<QuizRequest>, JsonRejection>,
) -> ApiResponse<Json<NextQuestion>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!("Rejected quiz request: {rejection}");
        ApiError::BadRequest
    })?;

    let candidates = match request.quiz_category.id {
        ALL_CATEGORIES => questions::get_all_questions(&pool).await?,
        id => questions::get_questions_for_category(&pool, id).await?,
    };
    let candidates = non_empty(candidates)?;

    let question =
        select_next(&candidates, &request.previous_questions, &mut rand::thread_rng()).cloned();
    match &question {
        Some(question) => {
            let category = question.category.to_string();
            QUIZ_QUESTIONS_SERVED
                .with_label_values(&[category.as_str()])
                .inc();
        }
        None => tracing::debug!(
            "Quiz over after {} questions",
            request.previous_questions.len()
        ),
    }

    Ok(Json(NextQuestion {
        success: true,
        question,
    }))
}

pub fn quiz_router(state: AppState) -> Router {
    Router::new()
        .route("/quizzes", post(next_question))
        .with_state(state)
}
