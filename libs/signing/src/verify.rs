//! Signer recovery and order authorization
//!
//! Stateless and pure: recovery needs no store, which keeps the
//! authorization gate independently testable from the book.

use crate::codec::{CodecError, OrderCodec};
use crate::domain::Eip712Domain;
use ethers::types::{Address, Signature, H256};
use ethers::utils::hash_message;
use std::str::FromStr;
use thiserror::Error;
use types::order::{Order, SigningScheme};

/// Signature verification errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SigningError {
    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Signature does not recover to any identity")]
    RecoveryFailed,

    #[error("Cannot hash order: {0}")]
    Codec(#[from] CodecError),
}

/// Recover the identity that produced `signature` over `digest`.
///
/// The signature must be a 65-byte recoverable secp256k1 signature in hex
/// (with or without `0x` prefix). For `EthSign`, the digest is first
/// wrapped in the standard signed-message prefix, matching what wallets
/// sign.
pub fn recover_signer(
    digest: H256,
    signature: &str,
    scheme: SigningScheme,
) -> Result<Address, SigningError> {
    let signature = Signature::from_str(signature.trim_start_matches("0x"))
        .map_err(|e| SigningError::MalformedSignature(e.to_string()))?;

    let signed_digest = match scheme {
        SigningScheme::Eip712 => digest,
        SigningScheme::EthSign => hash_message(digest.as_bytes()),
    };

    signature
        .recover(signed_digest)
        .map_err(|_| SigningError::RecoveryFailed)
}

/// Check that `claimed` authorized `order`.
///
/// Computes the order's fingerprint, recovers the signer under the
/// order's declared scheme, and compares addresses. Address comparison is
/// byte equality, which subsumes case-insensitive hex comparison. This is
/// the sole authorization gate for admission: any field altered after
/// signing changes the fingerprint and fails recovery.
pub fn verify_order(
    order: &Order,
    signature: &str,
    claimed: Address,
    domain: &Eip712Domain,
) -> Result<bool, SigningError> {
    let fingerprint = OrderCodec::fingerprint(order, domain)?;
    let recovered = recover_signer(fingerprint, signature, order.signing_scheme)?;
    Ok(recovered == claimed)
}
