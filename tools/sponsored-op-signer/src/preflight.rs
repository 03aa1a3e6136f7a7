//! Sponsor funding preconditions.
//!
//! Checked before handing an operation to a relayer. A shortfall is an error, never a reason to
//! skip or simulate the sponsored step.

use alloy_primitives::U256;
use sponsored_op_types::UserOperation;

use crate::errors::{Error, Result};

/// Verification gas multiplier the v0.6 entry point applies when a paymaster is present
/// (account validation, paymaster validation, and `postOp`).
pub const PAYMASTER_VERIFICATION_GAS_MULTIPLIER: u64 = 3;

/// Maximum wei the entry point will reserve from the payer for `op`.
pub fn required_prefund(op: &UserOperation) -> U256 {
    let multiplier = if op.is_sponsored() { PAYMASTER_VERIFICATION_GAS_MULTIPLIER } else { 1 };
    let gas = op
        .call_gas_limit
        .saturating_add(op.verification_gas_limit.saturating_mul(U256::from(multiplier)))
        .saturating_add(op.pre_verification_gas);
    gas.saturating_mul(op.max_fee_per_gas)
}

/// Fail unless `available` covers the prefund of `op`.
pub fn check_sponsor_balance(op: &UserOperation, available: U256) -> Result<()> {
    let required = required_prefund(op);
    if available < required {
        tracing::warn!(%required, %available, "sponsor balance does not cover prefund");
        return Err(Error::InsufficientSponsorBalance { required, available });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::Bytes;

    fn op(sponsored: bool) -> UserOperation {
        UserOperation {
            call_gas_limit: U256::from(100_000u64),
            verification_gas_limit: U256::from(100_000u64),
            pre_verification_gas: U256::from(21_000u64),
            max_fee_per_gas: U256::from(20_000_000_000u64),
            paymaster_and_data: if sponsored { Bytes::from(vec![0xaa; 40]) } else { Bytes::new() },
            ..Default::default()
        }
    }

    #[test]
    fn test_unsponsored_prefund() {
        // (100_000 + 100_000 + 21_000) * 20 gwei
        assert_eq!(required_prefund(&op(false)), U256::from(4_420_000_000_000_000u64));
    }

    #[test]
    fn test_sponsored_prefund_triples_verification_gas() {
        // (100_000 + 300_000 + 21_000) * 20 gwei
        assert_eq!(required_prefund(&op(true)), U256::from(8_420_000_000_000_000u64));
    }

    #[test]
    fn test_shortfall_is_reported() {
        let required = required_prefund(&op(true));
        let available = required - U256::from(1u64);
        assert_eq!(
            check_sponsor_balance(&op(true), available),
            Err(Error::InsufficientSponsorBalance { required, available })
        );
        assert!(check_sponsor_balance(&op(true), required).is_ok());
    }

    #[test]
    fn test_overflow_saturates() {
        let mut huge = op(true);
        huge.max_fee_per_gas = U256::MAX;
        assert_eq!(required_prefund(&huge), U256::MAX);
    }
}
