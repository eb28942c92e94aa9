//! Signing library — order canonicalization and signature verification
//!
//! Splits hash derivation from signature recovery so each half can be
//! tested and fuzzed on its own. The codec produces one canonical,
//! injective encoding per order; the verifier recovers the signing
//! identity from a digest and a recoverable secp256k1 signature.
//!
//! # Modules
//! - `domain`: typed-data domain separation (name/version/chain/contract)
//! - `codec`: canonical order encoding, struct hash, signing hash
//! - `verify`: signer recovery and order authorization checks

pub mod codec;
pub mod domain;
pub mod verify;

pub use codec::{CodecError, OrderCodec};
pub use domain::Eip712Domain;
pub use verify::{recover_signer, verify_order, SigningError};
