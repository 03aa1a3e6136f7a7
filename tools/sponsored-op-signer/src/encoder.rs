//! Canonical encoding of a user operation for hashing.
//!
//! The layout is the ABI encoding of the fixed tuple the v0.6 entry point packs:
//!
//! - address sender
//! - uint256 nonce
//! - bytes32 keccak256(initCode)
//! - bytes32 keccak256(callData)
//! - uint256 callGasLimit
//! - uint256 verificationGasLimit
//! - uint256 preVerificationGas
//! - uint256 maxFeePerGas
//! - uint256 maxPriorityFeePerGas
//! - bytes32 keccak256(paymasterAndData)
//!
//! Variable-length fields only contribute their hash, so the output is always ten words wide.
//! `signature` is never part of the encoding.

use alloy_primitives::{Address, FixedBytes, U256};
use sha3::{Digest, Keccak256};
use sponsored_op_types::UserOperation;

use crate::errors::{malformed, Result};

/// Width of the canonical encoding in bytes.
pub const ENCODED_OPERATION_LEN: usize = 32 * 10;

pub(crate) fn keccak256_bytes(bytes: &[u8]) -> FixedBytes<32> {
    let mut h = Keccak256::new();
    h.update(bytes);
    let out = h.finalize();
    let mut b = [0u8; 32];
    b.copy_from_slice(out.as_slice());
    FixedBytes(b)
}

pub(crate) fn push_address_word(buf: &mut Vec<u8>, address: Address) {
    let mut padded = [0u8; 32];
    padded[12..32].copy_from_slice(address.as_slice());
    buf.extend_from_slice(&padded);
}

pub(crate) fn push_u256_word(buf: &mut Vec<u8>, value: U256) {
    buf.extend_from_slice(&value.to_be_bytes::<32>());
}

/// Reject operations that cannot be meaningfully hashed.
///
/// Width problems are caught by the types themselves (an `Address` is always 20 bytes); what is
/// left is presence: a zero sender or empty call data would otherwise encode silently.
pub fn validate_operation(op: &UserOperation) -> Result<()> {
    if op.sender == Address::ZERO {
        return Err(malformed("sender must be a non-zero address"));
    }
    if op.call_data.is_empty() {
        return Err(malformed("callData must not be empty"));
    }
    Ok(())
}

/// Encode the operation into its fixed-width canonical form.
pub fn encode_operation(op: &UserOperation) -> Result<Vec<u8>> {
    validate_operation(op)?;

    let mut buf = Vec::with_capacity(ENCODED_OPERATION_LEN);
    push_address_word(&mut buf, op.sender);
    push_u256_word(&mut buf, op.nonce);
    buf.extend_from_slice(keccak256_bytes(&op.init_code).as_slice());
    buf.extend_from_slice(keccak256_bytes(&op.call_data).as_slice());
    push_u256_word(&mut buf, op.call_gas_limit);
    push_u256_word(&mut buf, op.verification_gas_limit);
    push_u256_word(&mut buf, op.pre_verification_gas);
    push_u256_word(&mut buf, op.max_fee_per_gas);
    push_u256_word(&mut buf, op.max_priority_fee_per_gas);
    buf.extend_from_slice(keccak256_bytes(&op.paymaster_and_data).as_slice());

    debug_assert_eq!(buf.len(), ENCODED_OPERATION_LEN);
    Ok(buf)
}
