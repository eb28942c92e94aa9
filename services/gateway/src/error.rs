//! Central error type for the gateway
//!
//! Every domain error maps to a structured `{error, message}` body with
//! a stable code, and every rejection is written to the audit log before
//! it leaves the process — a rejected admission or failed transition is
//! never silently dropped.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use escrow::EscrowError;
use orderbook::BookError;
use serde_json::json;
use signing::SigningError;
use thiserror::Error;
use types::errors::ValidationError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidSignature(String),

    #[error("{0}")]
    OrderExpired(String),

    #[error("Order with this fingerprint is already resident")]
    DuplicateOrder,

    #[error("Fill-or-kill order cannot be fully matched")]
    Unfillable,

    #[error("{0}")]
    WrongState(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    AmountMismatch(String),

    #[error("{0}")]
    NotFound(String),

    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn code_and_status(&self) -> (&'static str, StatusCode) {
        match self {
            AppError::Validation(_) => ("VALIDATION", StatusCode::BAD_REQUEST),
            AppError::InvalidSignature(_) => ("INVALID_SIGNATURE", StatusCode::UNAUTHORIZED),
            AppError::OrderExpired(_) => ("ORDER_EXPIRED", StatusCode::BAD_REQUEST),
            AppError::DuplicateOrder => ("DUPLICATE_ORDER", StatusCode::CONFLICT),
            AppError::Unfillable => ("UNFILLABLE", StatusCode::CONFLICT),
            AppError::WrongState(_) => ("WRONG_STATE", StatusCode::CONFLICT),
            AppError::Unauthorized(_) => ("UNAUTHORIZED", StatusCode::FORBIDDEN),
            AppError::AmountMismatch(_) => ("AMOUNT_MISMATCH", StatusCode::BAD_REQUEST),
            AppError::NotFound(_) => ("NOT_FOUND", StatusCode::NOT_FOUND),
            AppError::RateLimitExceeded(_) => {
                ("RATE_LIMIT_EXCEEDED", StatusCode::TOO_MANY_REQUESTS)
            }
            AppError::Internal(_) => ("INTERNAL_ERROR", StatusCode::INTERNAL_SERVER_ERROR),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (code, status) = self.code_and_status();
        let message = match &self {
            // Do not leak internal details
            AppError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        // Audit log: financial correctness depends on rejections being
        // observable, not just returned.
        tracing::warn!(code, %message, "request rejected");

        let body = Json(json!({
            "error": code,
            "message": message,
        }));
        (status, body).into_response()
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl From<SigningError> for AppError {
    fn from(err: SigningError) -> Self {
        match err {
            SigningError::Codec(inner) => AppError::Validation(inner.to_string()),
            other => AppError::InvalidSignature(other.to_string()),
        }
    }
}

impl From<BookError> for AppError {
    fn from(err: BookError) -> Self {
        match err {
            BookError::InvalidSignature => AppError::InvalidSignature(err.to_string()),
            BookError::Signing(inner) => inner.into(),
            BookError::Expired { .. } => AppError::OrderExpired(err.to_string()),
            BookError::Duplicate => AppError::DuplicateOrder,
            BookError::Unfillable => AppError::Unfillable,
            BookError::NotFound { .. } => AppError::NotFound(err.to_string()),
            BookError::Unauthorized => AppError::Unauthorized(err.to_string()),
            BookError::Match(_) | BookError::Ledger(_) => {
                AppError::Internal(anyhow::anyhow!(err))
            }
        }
    }
}

impl From<EscrowError> for AppError {
    fn from(err: EscrowError) -> Self {
        match err {
            EscrowError::NotFound { .. } => AppError::NotFound(err.to_string()),
            EscrowError::WrongState { .. } => AppError::WrongState(err.to_string()),
            EscrowError::Unauthorized { .. } => AppError::Unauthorized(err.to_string()),
            EscrowError::AmountMismatch { .. } => AppError::AmountMismatch(err.to_string()),
            EscrowError::InvalidSignature => AppError::InvalidSignature(err.to_string()),
            EscrowError::Signing(inner) => inner.into(),
            EscrowError::InvalidAmount => AppError::Validation(err.to_string()),
            EscrowError::Vault(_) => AppError::Validation(err.to_string()),
        }
    }
}
