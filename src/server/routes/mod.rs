mod categories;
mod questions;
mod quizzes;

use std::collections::BTreeMap;

pub use categories::category_router;
pub use questions::questions_router;
pub use quizzes::quiz_router;

use crate::db::Category;

use super::error::ApiError;

// serialized as {"1": "Science", ...}, the shape the frontend expects
fn category_map(categories: Vec<Category>) -> BTreeMap<i64, String> {
    categories.into_iter().map(|c| (c.id, c.kind)).collect()
}

fn non_empty<T>(items: Vec<T>) -> Result<Vec<T>, ApiError> {
    if items.is_empty() {
        Err(ApiError::NotFound)
    } else {
        Ok(items)
    }
}
