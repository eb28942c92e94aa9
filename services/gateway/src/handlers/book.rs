use crate::error::AppError;
use crate::models::{parse_address, BookQuery, BookResponse};
use crate::state::{unix_now, AppState};
use axum::extract::{Path, Query, State};
use axum::Json;
use types::pair::TokenPair;

const DEFAULT_DEPTH: usize = 50;

/// Point-in-time snapshot of resident orders for a pair, both sides in
/// price-time priority order.
pub async fn get_book(
    State(state): State<AppState>,
    Path((base, quote)): Path<(String, String)>,
    Query(query): Query<BookQuery>,
) -> Result<Json<BookResponse>, AppError> {
    let base = parse_address("base", &base)?;
    let quote = parse_address("quote", &quote)?;
    let depth = query.depth.unwrap_or(DEFAULT_DEPTH);

    let snapshot = state
        .exchange
        .snapshot(TokenPair::new(base, quote), depth, unix_now());
    Ok(Json(BookResponse::from(&snapshot)))
}
