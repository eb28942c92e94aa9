//! Typed-data domain separation
//!
//! A domain separator mixes application name, version, chain id, and the
//! verifying contract address into every signing hash, so a signed order
//! can never be replayed against a different deployment or application.

use ethers::abi::Token;
use ethers::types::{Address, H256, U256};
use ethers::utils::keccak256;
use serde::{Deserialize, Serialize};

/// Type string of the domain struct itself (EIP-712 standard form).
const DOMAIN_TYPE: &str =
    "EIP712Domain(string name,string version,uint256 chainId,address verifyingContract)";

/// Domain parameters for one venue deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eip712Domain {
    pub name: String,
    pub version: String,
    pub chain_id: u64,
    pub verifying_contract: Address,
}

impl Eip712Domain {
    pub fn new(chain_id: u64, verifying_contract: Address) -> Self {
        Self {
            name: "SwapVenue".to_string(),
            version: "1".to_string(),
            chain_id,
            verifying_contract,
        }
    }

    /// Compute the 32-byte domain separator.
    pub fn separator(&self) -> H256 {
        let encoded = ethers::abi::encode(&[
            Token::FixedBytes(keccak256(DOMAIN_TYPE.as_bytes()).to_vec()),
            Token::FixedBytes(keccak256(self.name.as_bytes()).to_vec()),
            Token::FixedBytes(keccak256(self.version.as_bytes()).to_vec()),
            Token::Uint(U256::from(self.chain_id)),
            Token::Address(self.verifying_contract),
        ]);
        H256::from(keccak256(encoded))
    }

    /// Final digest over a struct hash: `keccak256(0x1901 ‖ separator ‖ struct_hash)`.
    pub fn digest(&self, struct_hash: H256) -> H256 {
        let mut data = Vec::with_capacity(66);
        data.extend_from_slice(&[0x19, 0x01]);
        data.extend_from_slice(self.separator().as_bytes());
        data.extend_from_slice(struct_hash.as_bytes());
        H256::from(keccak256(data))
    }
}
