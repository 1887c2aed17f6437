use axum::extract::{FromRequestParts, Query};
use serde::Deserialize;

use super::error::ApiError;

pub const QUESTIONS_PER_PAGE: usize = 10;

#[derive(Deserialize, Debug)]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

/// `?page=N` query extractor answering with the JSON error envelope on garbage input.
#[derive(FromRequestParts, Deserialize, Debug)]
#[from_request(via(Query), rejection(ApiError))]
#[serde(transparent)]
pub struct PageQuery(pub Pagination);

/// Slice of `items` for a 1-based `page`. Pages before the first or past the end are empty.
pub fn paginate<T>(items: &[T], page: i64) -> &[T] {
    if page < 1 {
        return &[];
    }
    let start = ((page - 1) as usize).saturating_mul(QUESTIONS_PER_PAGE);
    if start >= items.len() {
        return &[];
    }
    let end = (start + QUESTIONS_PER_PAGE).min(items.len());
    &items[start..end]
}
