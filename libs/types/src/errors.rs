//! Field validation error taxonomy
//!
//! Every order field gets an explicit presence/type/range check at the
//! boundary before it reaches the codec or the book. Rejected fields
//! produce one of these errors; nothing is silently defaulted.

use thiserror::Error;

/// Order field validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Amount must be positive: {field}")]
    ZeroAmount { field: &'static str },

    #[error("Sell and buy token must differ")]
    IdenticalTokens,

    #[error("Address must not be zero: {field}")]
    ZeroAddress { field: &'static str },

    #[error("Malformed address in {field}: {value}")]
    MalformedAddress { field: &'static str, value: String },

    #[error("Malformed amount in {field}: {value}")]
    MalformedAmount { field: &'static str, value: String },

    #[error("Malformed hex bytes in {field}")]
    MalformedBytes { field: &'static str },
}
