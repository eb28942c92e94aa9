use crate::error::AppError;
use crate::models::{
    parse_address, parse_hash, CancelOrderRequest, CancelOrderResponse, SubmitOrderRequest,
    SubmitOrderResponse,
};
use crate::state::{unix_now, AppState};
use axum::extract::{Path, State};
use axum::Json;

/// Accept a signed order: `{order fields, signature}`.
///
/// Idempotent on retransmission — resubmitting an admitted order returns
/// the prior result.
pub async fn submit_order(
    State(state): State<AppState>,
    Json(payload): Json<SubmitOrderRequest>,
) -> Result<Json<SubmitOrderResponse>, AppError> {
    let order = payload.parse()?;

    state
        .rate_limiter
        .check(&format!("{:?}:submit", order.signer), 20, 10.0)?;

    let submission = state
        .exchange
        .submit(order, &payload.signature, unix_now())?;

    tracing::info!(
        fingerprint = ?submission.fingerprint,
        trades = submission.trades.len(),
        status = ?submission.status,
        "order admitted"
    );
    Ok(Json(SubmitOrderResponse::from(&submission)))
}

/// Prior admission result by fingerprint.
pub async fn get_order(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Result<Json<SubmitOrderResponse>, AppError> {
    let fingerprint = parse_hash("fingerprint", &fingerprint)?;
    let submission = state
        .exchange
        .order_status(fingerprint)
        .ok_or_else(|| AppError::NotFound(format!("order {fingerprint:?}")))?;
    Ok(Json(SubmitOrderResponse::from(&submission)))
}

/// Cancel a resident order. Only the signer may cancel; doubly-sent
/// cancels are no-ops.
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
    Json(payload): Json<CancelOrderRequest>,
) -> Result<Json<CancelOrderResponse>, AppError> {
    let fingerprint = parse_hash("fingerprint", &fingerprint)?;
    let requester = parse_address("requester", &payload.requester)?;

    state
        .rate_limiter
        .check(&format!("{requester:?}:cancel"), 50, 25.0)?;

    let status = state.exchange.cancel(fingerprint, requester)?;
    Ok(Json(CancelOrderResponse { status }))
}
