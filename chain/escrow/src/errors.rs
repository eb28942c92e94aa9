//! Escrow error taxonomy
//!
//! Every failed transition is surfaced verbatim to the caller; no funds
//! move on any error path.

use crate::instance::EscrowState;
use ethers::types::U256;
use signing::SigningError;
use thiserror::Error;
use types::ids::EscrowId;

/// Vault-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VaultError {
    #[error("Insufficient balance: required {required}, available {available}")]
    InsufficientBalance { required: U256, available: U256 },

    #[error("Arithmetic overflow in balance calculation")]
    Overflow,
}

/// Escrow-specific errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EscrowError {
    #[error("Escrow instance not found: {instance_id}")]
    NotFound { instance_id: EscrowId },

    #[error("Wrong state: transition requires {required:?}, instance is {actual:?}")]
    WrongState {
        required: EscrowState,
        actual: EscrowState,
    },

    #[error("Unauthorized: caller is not the designated {role}")]
    Unauthorized { role: &'static str },

    #[error("Amount mismatch: configured {expected}, got {actual}")]
    AmountMismatch { expected: U256, actual: U256 },

    #[error("Release signature does not recover to the arbiter")]
    InvalidSignature,

    #[error("Signature error: {0}")]
    Signing(#[from] SigningError),

    #[error("Escrow amount must be positive")]
    InvalidAmount,

    #[error("Vault error: {0}")]
    Vault(#[from] VaultError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrong_state_display() {
        let err = EscrowError::WrongState {
            required: EscrowState::AwaitingConfirmation,
            actual: EscrowState::Complete,
        };
        assert!(err.to_string().contains("AwaitingConfirmation"));
        assert!(err.to_string().contains("Complete"));
    }

    #[test]
    fn test_vault_error_into_escrow_error() {
        let vault_err = VaultError::Overflow;
        let escrow_err: EscrowError = vault_err.into();
        assert!(matches!(escrow_err, EscrowError::Vault(_)));
    }

    #[test]
    fn test_unauthorized_display() {
        let err = EscrowError::Unauthorized { role: "arbiter" };
        assert_eq!(
            err.to_string(),
            "Unauthorized: caller is not the designated arbiter"
        );
    }
}
