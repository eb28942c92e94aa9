use crate::error::AppError;
use crate::models::{
    parse_address, parse_amount, parse_hash, ConfirmRequest, CreateEscrowRequest, DepositRequest,
    EscrowView, EventView, FundRequest, RefundRequest, ReleaseRequest,
};
use crate::state::{unix_now, AppState};
use axum::extract::{Path, State};
use axum::Json;
use escrow::EscrowContract;
use std::sync::MutexGuard;
use types::ids::EscrowId;
use uuid::Uuid;

fn lock_contract(state: &AppState) -> Result<MutexGuard<'_, EscrowContract>, AppError> {
    state
        .escrow
        .lock()
        .map_err(|_| AppError::Internal(anyhow::anyhow!("escrow lock poisoned")))
}

fn parse_instance_id(value: &str) -> Result<EscrowId, AppError> {
    Uuid::parse_str(value)
        .map(EscrowId::from_uuid)
        .map_err(|_| AppError::Validation(format!("Malformed instance id: {value}")))
}

/// Instantiate an escrow bound to an off-chain trade via `trade_hash`.
pub async fn create_instance(
    State(state): State<AppState>,
    Json(payload): Json<CreateEscrowRequest>,
) -> Result<Json<EscrowView>, AppError> {
    let depositor = parse_address("depositor", &payload.depositor)?;
    let counterparty = parse_address("counterparty", &payload.counterparty)?;
    let arbiter = parse_address("arbiter", &payload.arbiter)?;
    let asset = parse_address("asset", &payload.asset)?;
    let amount = parse_amount("amount", &payload.amount)?;
    let trade_hash = parse_hash("trade_hash", &payload.trade_hash)?;

    let mut contract = lock_contract(&state)?;
    let instance_id = contract.create(
        depositor,
        counterparty,
        arbiter,
        asset,
        amount,
        trade_hash,
        unix_now(),
    )?;

    tracing::info!(%instance_id, "escrow instance created");
    let instance = contract
        .instance(instance_id)
        .ok_or_else(|| AppError::Internal(anyhow::anyhow!("instance vanished after create")))?;
    Ok(Json(EscrowView::from(instance)))
}

/// Credit a party's balance in the contract's token ledger.
pub async fn fund_party(
    State(state): State<AppState>,
    Json(payload): Json<FundRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let party = parse_address("party", &payload.party)?;
    let token = parse_address("token", &payload.token)?;
    let amount = parse_amount("amount", &payload.amount)?;

    let mut contract = lock_contract(&state)?;
    contract.fund(party, token, amount)?;
    let balance = contract.balance(party, token);
    Ok(Json(serde_json::json!({ "balance": balance.to_string() })))
}

/// `deposit`: by the depositor, exact amount only.
pub async fn deposit(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<DepositRequest>,
) -> Result<Json<EventView>, AppError> {
    let instance_id = parse_instance_id(&id)?;
    let caller = parse_address("caller", &payload.caller)?;
    let amount = parse_amount("amount", &payload.amount)?;

    let mut contract = lock_contract(&state)?;
    let event = contract.deposit(instance_id, caller, amount)?;
    Ok(Json(EventView::from(event)))
}

/// `confirm`: by the counterparty; releases custody to them.
pub async fn confirm(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ConfirmRequest>,
) -> Result<Json<EventView>, AppError> {
    let instance_id = parse_instance_id(&id)?;
    let caller = parse_address("caller", &payload.caller)?;

    let mut contract = lock_contract(&state)?;
    let event = contract.confirm_trade(instance_id, caller)?;
    Ok(Json(EventView::from(event)))
}

/// `release`: arbiter-signed release to an arbitrary recipient.
pub async fn release(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<ReleaseRequest>,
) -> Result<Json<EventView>, AppError> {
    let instance_id = parse_instance_id(&id)?;
    let to = parse_address("to", &payload.to)?;
    let asset = parse_address("asset", &payload.asset)?;
    let amount = parse_amount("amount", &payload.amount)?;

    let mut contract = lock_contract(&state)?;
    let event =
        contract.release_with_signature(instance_id, to, asset, amount, &payload.signature)?;
    Ok(Json(EventView::from(event)))
}

/// `refund`: by the arbiter; custody returns to the depositor.
pub async fn refund(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<RefundRequest>,
) -> Result<Json<EventView>, AppError> {
    let instance_id = parse_instance_id(&id)?;
    let caller = parse_address("caller", &payload.caller)?;

    let mut contract = lock_contract(&state)?;
    let event = contract.refund(instance_id, caller)?;
    Ok(Json(EventView::from(event)))
}

/// Current instance state.
pub async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<EscrowView>, AppError> {
    let instance_id = parse_instance_id(&id)?;
    let contract = lock_contract(&state)?;
    let instance = contract
        .instance(instance_id)
        .ok_or_else(|| AppError::NotFound(format!("escrow instance {id}")))?;
    Ok(Json(EscrowView::from(instance)))
}

/// Event log for one instance: name plus `trade_id`, `amount`, `party`.
pub async fn get_events(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<EventView>>, AppError> {
    let instance_id = parse_instance_id(&id)?;
    let contract = lock_contract(&state)?;
    if contract.instance(instance_id).is_none() {
        return Err(AppError::NotFound(format!("escrow instance {id}")));
    }
    let events = contract
        .events_for(instance_id)
        .into_iter()
        .map(EventView::from)
        .collect();
    Ok(Json(events))
}
