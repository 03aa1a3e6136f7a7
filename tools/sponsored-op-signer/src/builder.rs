//! Draft user operation construction.

use alloy_primitives::{Address, Bytes, U256};
use sponsored_op_types::UserOperation;

use crate::calldata::sponsored_transfer_call_data;
use crate::errors::{malformed, Result};
use crate::paymaster::pack_paymaster_and_data;

pub const DEFAULT_CALL_GAS_LIMIT: U256 = U256::from_limbs([100_000, 0, 0, 0]);
pub const DEFAULT_VERIFICATION_GAS_LIMIT: U256 = U256::from_limbs([100_000, 0, 0, 0]);
pub const DEFAULT_PRE_VERIFICATION_GAS: U256 = U256::from_limbs([21_000, 0, 0, 0]);
/// 20 gwei.
pub const DEFAULT_MAX_FEE_PER_GAS: U256 = U256::from_limbs([20_000_000_000, 0, 0, 0]);
/// 2 gwei.
pub const DEFAULT_MAX_PRIORITY_FEE_PER_GAS: U256 = U256::from_limbs([2_000_000_000, 0, 0, 0]);

/// Builder for draft operations.
///
/// `sender`, `nonce` and `call_data` have no defaults and must be set; gas fields fall back to
/// fixed estimates suitable for a single sponsored token transfer.
#[derive(Clone, Debug)]
pub struct UserOperationBuilder {
    sender: Option<Address>,
    nonce: Option<U256>,
    init_code: Bytes,
    call_data: Option<Bytes>,
    call_gas_limit: U256,
    verification_gas_limit: U256,
    pre_verification_gas: U256,
    max_fee_per_gas: U256,
    max_priority_fee_per_gas: U256,
    paymaster_and_data: Bytes,
}

impl Default for UserOperationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl UserOperationBuilder {
    pub fn new() -> Self {
        Self {
            sender: None,
            nonce: None,
            init_code: Bytes::new(),
            call_data: None,
            call_gas_limit: DEFAULT_CALL_GAS_LIMIT,
            verification_gas_limit: DEFAULT_VERIFICATION_GAS_LIMIT,
            pre_verification_gas: DEFAULT_PRE_VERIFICATION_GAS,
            max_fee_per_gas: DEFAULT_MAX_FEE_PER_GAS,
            max_priority_fee_per_gas: DEFAULT_MAX_PRIORITY_FEE_PER_GAS,
            paymaster_and_data: Bytes::new(),
        }
    }

    pub fn sender(mut self, sender: Address) -> Self {
        self.sender = Some(sender);
        self
    }

    pub fn nonce(mut self, nonce: U256) -> Self {
        self.nonce = Some(nonce);
        self
    }

    pub fn init_code(mut self, init_code: Bytes) -> Self {
        self.init_code = init_code;
        self
    }

    pub fn call_data(mut self, call_data: Bytes) -> Self {
        self.call_data = Some(call_data);
        self
    }

    /// Call data for a token transfer executed by the account.
    pub fn token_transfer(self, token: Address, to: Address, amount: U256) -> Self {
        self.call_data(sponsored_transfer_call_data(token, to, amount))
    }

    pub fn call_gas_limit(mut self, gas: U256) -> Self {
        self.call_gas_limit = gas;
        self
    }

    pub fn verification_gas_limit(mut self, gas: U256) -> Self {
        self.verification_gas_limit = gas;
        self
    }

    pub fn pre_verification_gas(mut self, gas: U256) -> Self {
        self.pre_verification_gas = gas;
        self
    }

    pub fn max_fee_per_gas(mut self, fee: U256) -> Self {
        self.max_fee_per_gas = fee;
        self
    }

    pub fn max_priority_fee_per_gas(mut self, fee: U256) -> Self {
        self.max_priority_fee_per_gas = fee;
        self
    }

    pub fn paymaster_and_data(mut self, data: Bytes) -> Self {
        self.paymaster_and_data = data;
        self
    }

    /// Sponsor the operation through `paymaster` on behalf of `sponsor`.
    pub fn sponsored_by(self, paymaster: Address, sponsor: Address) -> Self {
        self.paymaster_and_data(pack_paymaster_and_data(paymaster, sponsor.as_slice()))
    }

    pub fn build(self) -> Result<UserOperation> {
        let sender = self.sender.ok_or_else(|| malformed("sender is required"))?;
        let nonce = self.nonce.ok_or_else(|| malformed("nonce is required"))?;
        let call_data = self.call_data.ok_or_else(|| malformed("callData is required"))?;

        Ok(UserOperation {
            sender,
            nonce,
            init_code: self.init_code,
            call_data,
            call_gas_limit: self.call_gas_limit,
            verification_gas_limit: self.verification_gas_limit,
            pre_verification_gas: self.pre_verification_gas,
            max_fee_per_gas: self.max_fee_per_gas,
            max_priority_fee_per_gas: self.max_priority_fee_per_gas,
            paymaster_and_data: self.paymaster_and_data,
            signature: Bytes::new(),
        })
    }
}
