use alloy_primitives::{Address, Bytes, U256};
use serde::{Deserialize, Serialize};

/// ERC-4337 v0.6 user operation.
///
/// Every field is always present. When deserializing, only `signature` may be omitted (it is empty
/// while the operation is a draft); a document missing any other field is rejected.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserOperation {
    /// Account issuing the intent.
    pub sender: Address,
    /// Replay-protection counter assigned by the entry point.
    pub nonce: U256,
    /// Account factory call, empty when the account already exists.
    pub init_code: Bytes,
    /// Call the account executes (usually `execute(dest, value, func)`).
    pub call_data: Bytes,
    pub call_gas_limit: U256,
    pub verification_gas_limit: U256,
    pub pre_verification_gas: U256,
    pub max_fee_per_gas: U256,
    pub max_priority_fee_per_gas: U256,
    /// Paymaster address followed by paymaster-specific data.
    pub paymaster_and_data: Bytes,
    /// Signature over the operation hash (r || s || v); not covered by the hash itself.
    #[serde(default)]
    pub signature: Bytes,
}

impl UserOperation {
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    /// Copy of this operation with the signature cleared.
    pub fn without_signature(&self) -> Self {
        Self { signature: Bytes::new(), ..self.clone() }
    }

    /// Whether `max_priority_fee_per_gas <= max_fee_per_gas`.
    ///
    /// Reported, not enforced; the entry point caps the priority fee itself.
    pub fn fee_market_consistent(&self) -> bool {
        self.max_priority_fee_per_gas <= self.max_fee_per_gas
    }

    pub fn is_sponsored(&self) -> bool {
        !self.paymaster_and_data.is_empty()
    }
}
