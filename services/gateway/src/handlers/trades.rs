use crate::error::AppError;
use crate::models::{parse_address, parse_hash, TradeView, TradesQuery};
use crate::state::AppState;
use axum::extract::{Query, State};
use axum::Json;
use settlement::TradeFilter;
use types::pair::TokenPair;

/// Ledger entries filtered by pair, time range, and/or order.
pub async fn get_trades(
    State(state): State<AppState>,
    Query(query): Query<TradesQuery>,
) -> Result<Json<Vec<TradeView>>, AppError> {
    let mut filter = TradeFilter::default().between(query.from, query.to);

    filter.pair = match (&query.base, &query.quote) {
        (Some(base), Some(quote)) => Some(TokenPair::new(
            parse_address("base", base)?,
            parse_address("quote", quote)?,
        )),
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "base and quote must be provided together".to_string(),
            ))
        }
    };
    filter.order = query
        .order
        .as_deref()
        .map(|o| parse_hash("order", o))
        .transpose()?;

    let trades = state.exchange.trades(&filter);
    Ok(Json(trades.iter().map(TradeView::from).collect()))
}
