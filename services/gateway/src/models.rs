//! Request and response models
//!
//! Requests carry amounts as decimal strings and addresses as hex
//! strings; every field is required and explicitly parsed. A malformed
//! or missing field rejects the request — nothing is defaulted.

use escrow::{EscrowEvent, EscrowInstance, EscrowState};
use ethers::types::{Address, Bytes, H256, U256};
use orderbook::book::{BookSnapshot, RestingOrderView};
use orderbook::Submission;
use serde::{Deserialize, Serialize};
use types::errors::ValidationError;
use types::order::{Order, OrderStatus, Side, SigningScheme};
use types::trade::Trade;

// ───────────────────────── Field parsing ─────────────────────────

pub fn parse_address(field: &'static str, value: &str) -> Result<Address, ValidationError> {
    value
        .parse::<Address>()
        .map_err(|_| ValidationError::MalformedAddress {
            field,
            value: value.to_string(),
        })
}

pub fn parse_amount(field: &'static str, value: &str) -> Result<U256, ValidationError> {
    U256::from_dec_str(value.trim()).map_err(|_| ValidationError::MalformedAmount {
        field,
        value: value.to_string(),
    })
}

pub fn parse_bytes(field: &'static str, value: &str) -> Result<Bytes, ValidationError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    if stripped.is_empty() {
        return Ok(Bytes::default());
    }
    hex::decode(stripped)
        .map(Bytes::from)
        .map_err(|_| ValidationError::MalformedBytes { field })
}

pub fn parse_hash(field: &'static str, value: &str) -> Result<H256, ValidationError> {
    let stripped = value.strip_prefix("0x").unwrap_or(value);
    let raw = hex::decode(stripped).map_err(|_| ValidationError::MalformedBytes { field })?;
    if raw.len() != 32 {
        return Err(ValidationError::MalformedBytes { field });
    }
    Ok(H256::from_slice(&raw))
}

/// Full-width hex rendering (Display for these types abbreviates).
pub fn fmt_hash(hash: &H256) -> String {
    format!("{hash:?}")
}

pub fn fmt_address(address: &Address) -> String {
    format!("{address:?}")
}

// ───────────────────────── Orders ─────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SubmitOrderRequest {
    pub sell_token: String,
    pub buy_token: String,
    pub sell_amount: String,
    pub buy_amount: String,
    pub valid_to: u64,
    pub signer: String,
    pub receiver: String,
    pub app_data: String,
    pub fee_amount: String,
    pub partially_fillable: bool,
    pub side: Side,
    pub signing_scheme: SigningScheme,
    pub nonce: u64,
    pub signature: String,
}

impl SubmitOrderRequest {
    /// Parse into a typed order, checking every field.
    pub fn parse(&self) -> Result<Order, ValidationError> {
        let order = Order {
            sell_token: parse_address("sell_token", &self.sell_token)?,
            buy_token: parse_address("buy_token", &self.buy_token)?,
            sell_amount: parse_amount("sell_amount", &self.sell_amount)?,
            buy_amount: parse_amount("buy_amount", &self.buy_amount)?,
            valid_to: self.valid_to,
            signer: parse_address("signer", &self.signer)?,
            receiver: parse_address("receiver", &self.receiver)?,
            app_data: parse_bytes("app_data", &self.app_data)?,
            fee_amount: parse_amount("fee_amount", &self.fee_amount)?,
            partially_fillable: self.partially_fillable,
            side: self.side,
            signing_scheme: self.signing_scheme,
            nonce: self.nonce,
        };
        order.validate()?;
        Ok(order)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TradeView {
    pub trade_id: String,
    pub sequence: u64,
    pub buy_order: String,
    pub sell_order: String,
    pub amount: String,
    pub price_numerator: String,
    pub price_denominator: String,
    pub executed_at: u64,
}

impl From<&Trade> for TradeView {
    fn from(trade: &Trade) -> Self {
        Self {
            trade_id: trade.trade_id.to_string(),
            sequence: trade.sequence,
            buy_order: fmt_hash(&trade.buy_order),
            sell_order: fmt_hash(&trade.sell_order),
            amount: trade.amount.to_string(),
            price_numerator: trade.price.numerator().to_string(),
            price_denominator: trade.price.denominator().to_string(),
            executed_at: trade.executed_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SubmitOrderResponse {
    pub accepted: bool,
    pub fingerprint: String,
    pub status: OrderStatus,
    pub remaining_amount: String,
    pub trades: Vec<TradeView>,
}

impl From<&Submission> for SubmitOrderResponse {
    fn from(submission: &Submission) -> Self {
        Self {
            accepted: true,
            fingerprint: fmt_hash(&submission.fingerprint),
            status: submission.status,
            remaining_amount: submission.remaining_amount.to_string(),
            trades: submission.trades.iter().map(TradeView::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CancelOrderRequest {
    pub requester: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderResponse {
    pub status: OrderStatus,
}

// ───────────────────────── Book ─────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct BookQuery {
    pub depth: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestingView {
    pub fingerprint: String,
    pub signer: String,
    pub price_numerator: String,
    pub price_denominator: String,
    pub remaining_amount: String,
    pub admitted_at: u64,
}

impl From<&RestingOrderView> for RestingView {
    fn from(view: &RestingOrderView) -> Self {
        Self {
            fingerprint: fmt_hash(&view.fingerprint),
            signer: fmt_address(&view.signer),
            price_numerator: view.price.numerator().to_string(),
            price_denominator: view.price.denominator().to_string(),
            remaining_amount: view.remaining_amount.to_string(),
            admitted_at: view.admitted_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BookResponse {
    pub base: String,
    pub quote: String,
    pub bids: Vec<RestingView>,
    pub asks: Vec<RestingView>,
}

impl From<&BookSnapshot> for BookResponse {
    fn from(snapshot: &BookSnapshot) -> Self {
        Self {
            base: fmt_address(&snapshot.pair.base),
            quote: fmt_address(&snapshot.pair.quote),
            bids: snapshot.bids.iter().map(RestingView::from).collect(),
            asks: snapshot.asks.iter().map(RestingView::from).collect(),
        }
    }
}

// ───────────────────────── Trades ─────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TradesQuery {
    pub base: Option<String>,
    pub quote: Option<String>,
    pub from: Option<u64>,
    pub to: Option<u64>,
    pub order: Option<String>,
}

// ───────────────────────── Escrow ─────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateEscrowRequest {
    pub depositor: String,
    pub counterparty: String,
    pub arbiter: String,
    pub asset: String,
    pub amount: String,
    pub trade_hash: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FundRequest {
    pub party: String,
    pub token: String,
    pub amount: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DepositRequest {
    pub caller: String,
    pub amount: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfirmRequest {
    pub caller: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReleaseRequest {
    pub to: String,
    pub asset: String,
    pub amount: String,
    pub signature: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RefundRequest {
    pub caller: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EscrowView {
    pub instance_id: String,
    pub state: EscrowState,
    pub depositor: String,
    pub counterparty: String,
    pub arbiter: String,
    pub asset: String,
    pub amount: String,
    pub trade_hash: String,
    pub created_at: u64,
}

impl From<&EscrowInstance> for EscrowView {
    fn from(instance: &EscrowInstance) -> Self {
        Self {
            instance_id: instance.instance_id.to_string(),
            state: instance.state,
            depositor: fmt_address(&instance.depositor),
            counterparty: fmt_address(&instance.counterparty),
            arbiter: fmt_address(&instance.arbiter),
            asset: fmt_address(&instance.asset),
            amount: instance.amount.to_string(),
            trade_hash: fmt_hash(&instance.trade_hash),
            created_at: instance.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    pub name: &'static str,
    pub instance_id: String,
    pub trade_id: String,
    pub amount: String,
    pub party: String,
}

impl From<&EscrowEvent> for EventView {
    fn from(event: &EscrowEvent) -> Self {
        Self {
            name: event.name(),
            instance_id: event.instance_id().to_string(),
            trade_id: fmt_hash(&event.trade_id()),
            amount: event.amount().to_string(),
            party: fmt_address(&event.party()),
        }
    }
}
