//! Canonical order encoding and hashing
//!
//! Every field is ABI-encoded at a fixed position with its declared type;
//! dynamic bytes enter as their keccak256 hash. Each encoded field
//! occupies exactly one 32-byte word, so no two distinct field sets can
//! produce the same encoding. The signing hash doubles as the order's
//! fingerprint: it is both the order's identity in the book and the
//! message the signer must have signed.

use crate::domain::Eip712Domain;
use ethers::abi::Token;
use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use thiserror::Error;
use types::errors::ValidationError;
use types::order::Order;

/// Type string of the order struct. Field order here is the canonical
/// field order; changing it is a breaking change to every stored
/// fingerprint and signature.
pub const ORDER_TYPE: &str = "SwapOrder(address sellToken,address buyToken,\
uint256 sellAmount,uint256 buyAmount,uint64 validTo,address signer,\
address receiver,bytes appData,uint256 feeAmount,bool partiallyFillable,\
uint8 side,uint8 signingScheme,uint64 nonce)";

/// Type string of an arbiter release authorization.
pub const RELEASE_TYPE: &str =
    "EscrowRelease(bytes32 instance,address to,address asset,uint256 amount)";

/// Canonical-encoding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    #[error("Order fails field validation: {0}")]
    Invalid(#[from] ValidationError),
}

/// Canonical order encoder.
///
/// Stateless; all functions are pure.
pub struct OrderCodec;

impl OrderCodec {
    /// Serialize the order's fields into the canonical byte layout.
    ///
    /// Fails if any field is out of its declared range (zero amounts,
    /// identical tokens, zero signer).
    pub fn encode(order: &Order) -> Result<Vec<u8>, CodecError> {
        order.validate()?;

        Ok(ethers::abi::encode(&[
            Token::FixedBytes(keccak256(ORDER_TYPE.as_bytes()).to_vec()),
            Token::Address(order.sell_token),
            Token::Address(order.buy_token),
            Token::Uint(order.sell_amount),
            Token::Uint(order.buy_amount),
            Token::Uint(U256::from(order.valid_to)),
            Token::Address(order.signer),
            Token::Address(order.receiver),
            Token::FixedBytes(keccak256(&order.app_data).to_vec()),
            Token::Uint(order.fee_amount),
            Token::Bool(order.partially_fillable),
            Token::Uint(U256::from(order.side.tag())),
            Token::Uint(U256::from(order.signing_scheme.tag())),
            Token::Uint(U256::from(order.nonce)),
        ]))
    }

    /// keccak256 of the canonical encoding.
    pub fn struct_hash(order: &Order) -> Result<H256, CodecError> {
        Ok(H256::from(keccak256(Self::encode(order)?)))
    }

    /// The order's fingerprint: its domain-separated signing hash.
    ///
    /// Deterministic over all fields; any field change changes the result.
    pub fn fingerprint(order: &Order, domain: &Eip712Domain) -> Result<H256, CodecError> {
        Ok(domain.digest(Self::struct_hash(order)?))
    }

    /// Digest an arbiter must sign to authorize an escrow release of
    /// `amount` of `asset` to `to` for the given instance.
    pub fn release_digest(
        instance: [u8; 32],
        to: Address,
        asset: Address,
        amount: U256,
        domain: &Eip712Domain,
    ) -> H256 {
        let encoded = ethers::abi::encode(&[
            Token::FixedBytes(keccak256(RELEASE_TYPE.as_bytes()).to_vec()),
            Token::FixedBytes(instance.to_vec()),
            Token::Address(to),
            Token::Address(asset),
            Token::Uint(amount),
        ]);
        domain.digest(H256::from(keccak256(encoded)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::Bytes;
    use types::order::{Side, SigningScheme};

    fn test_domain() -> Eip712Domain {
        Eip712Domain::new(1, Address::from([0x0C; 20]))
    }

    fn sample_order() -> Order {
        Order {
            sell_token: Address::from([0x11; 20]),
            buy_token: Address::from([0x22; 20]),
            sell_amount: U256::from(100u64),
            buy_amount: U256::from(200u64),
            valid_to: 1_900_000_000,
            signer: Address::from([0xAA; 20]),
            receiver: Address::from([0xBB; 20]),
            app_data: Bytes::from(vec![0xDE, 0xAD]),
            fee_amount: U256::from(3u64),
            partially_fillable: true,
            side: Side::Sell,
            signing_scheme: SigningScheme::Eip712,
            nonce: 7,
        }
    }

    #[test]
    fn test_encode_fixed_width() {
        let encoded = OrderCodec::encode(&sample_order()).unwrap();
        // 14 fields (type hash + 13 order fields), one word each
        assert_eq!(encoded.len(), 14 * 32);
    }

    #[test]
    fn test_encode_rejects_invalid() {
        let mut order = sample_order();
        order.sell_amount = U256::zero();
        assert!(matches!(
            OrderCodec::encode(&order),
            Err(CodecError::Invalid(_))
        ));
    }

    #[test]
    fn test_fingerprint_deterministic() {
        let domain = test_domain();
        let order = sample_order();
        assert_eq!(
            OrderCodec::fingerprint(&order, &domain).unwrap(),
            OrderCodec::fingerprint(&order, &domain).unwrap()
        );
    }

    #[test]
    fn test_fingerprint_changes_with_every_field() {
        let domain = test_domain();
        let base = OrderCodec::fingerprint(&sample_order(), &domain).unwrap();

        let variants: Vec<Order> = vec![
            {
                let mut o = sample_order();
                o.sell_token = Address::from([0x13; 20]);
                o
            },
            {
                let mut o = sample_order();
                o.buy_token = Address::from([0x23; 20]);
                o
            },
            {
                let mut o = sample_order();
                o.sell_amount = U256::from(101u64);
                o
            },
            {
                let mut o = sample_order();
                o.buy_amount = U256::from(201u64);
                o
            },
            {
                let mut o = sample_order();
                o.valid_to += 1;
                o
            },
            {
                let mut o = sample_order();
                o.signer = Address::from([0xAC; 20]);
                o
            },
            {
                let mut o = sample_order();
                o.receiver = Address::from([0xBC; 20]);
                o
            },
            {
                let mut o = sample_order();
                o.app_data = Bytes::from(vec![0xDE, 0xAE]);
                o
            },
            {
                let mut o = sample_order();
                o.fee_amount = U256::from(4u64);
                o
            },
            {
                let mut o = sample_order();
                o.partially_fillable = false;
                o
            },
            {
                let mut o = sample_order();
                o.side = Side::Buy;
                o
            },
            {
                let mut o = sample_order();
                o.signing_scheme = SigningScheme::EthSign;
                o
            },
            {
                let mut o = sample_order();
                o.nonce += 1;
                o
            },
        ];

        for variant in variants {
            let altered = OrderCodec::fingerprint(&variant, &domain).unwrap();
            assert_ne!(base, altered, "field change must change the fingerprint");
        }
    }

    #[test]
    fn test_fingerprint_depends_on_domain() {
        let order = sample_order();
        let a = OrderCodec::fingerprint(&order, &Eip712Domain::new(1, Address::from([0x0C; 20])))
            .unwrap();
        let b = OrderCodec::fingerprint(&order, &Eip712Domain::new(5, Address::from([0x0C; 20])))
            .unwrap();
        assert_ne!(a, b, "same order on another chain must hash differently");
    }

    #[test]
    fn test_release_digest_binds_all_inputs() {
        let domain = test_domain();
        let instance = [0x01; 32];
        let to = Address::from([0x44; 20]);
        let asset = Address::from([0x55; 20]);
        let amount = U256::from(100u64);

        let base = OrderCodec::release_digest(instance, to, asset, amount, &domain);
        assert_ne!(
            base,
            OrderCodec::release_digest([0x02; 32], to, asset, amount, &domain)
        );
        assert_ne!(
            base,
            OrderCodec::release_digest(instance, Address::from([0x45; 20]), asset, amount, &domain)
        );
        assert_ne!(
            base,
            OrderCodec::release_digest(instance, to, Address::from([0x56; 20]), amount, &domain)
        );
        assert_ne!(
            base,
            OrderCodec::release_digest(instance, to, asset, U256::from(101u64), &domain)
        );
    }

    proptest::proptest! {
        #[test]
        fn prop_amount_perturbation_changes_encoding(
            sell in 1u64..u64::MAX,
            buy in 1u64..u64::MAX,
            delta in 1u64..1000,
        ) {
            let mut a = sample_order();
            a.sell_amount = U256::from(sell);
            a.buy_amount = U256::from(buy);

            let mut b = a.clone();
            b.sell_amount = U256::from(sell.wrapping_add(delta).max(1));

            if a.sell_amount != b.sell_amount {
                let ea = OrderCodec::encode(&a).unwrap();
                let eb = OrderCodec::encode(&b).unwrap();
                proptest::prop_assert_ne!(ea, eb);
            }
        }
    }
}
