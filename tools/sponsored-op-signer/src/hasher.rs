//! Two-stage user operation hashing.
//!
//! `inner = keccak256(encode(op))` covers the operation fields; the signing hash then binds that
//! to the entry point and chain id: `keccak256(abi.encode(inner, entryPoint, chainId))`. The
//! result is the v0.6 `userOpHash`, the value the entry point hands to the account's
//! `validateUserOp`.

use alloy_primitives::{B256, U256};
use sponsored_op_types::{SigningContext, UserOperation};

use crate::encoder::{encode_operation, keccak256_bytes, push_address_word, push_u256_word};
use crate::errors::Result;

/// Hash of the canonical encoding, before domain separation.
pub fn user_op_hash_inner(op: &UserOperation) -> Result<B256> {
    let encoded = encode_operation(op)?;
    Ok(keccak256_bytes(&encoded))
}

/// Bind an inner hash to an entry point and chain id.
pub fn signing_hash_from_inner(inner: B256, ctx: &SigningContext) -> B256 {
    let mut buf = Vec::with_capacity(32 * 3);
    buf.extend_from_slice(inner.as_slice());
    push_address_word(&mut buf, ctx.entry_point);
    push_u256_word(&mut buf, U256::from(ctx.chain_id));
    keccak256_bytes(&buf)
}

/// The digest a sender signs for `op` under `ctx`.
pub fn signing_hash(op: &UserOperation, ctx: &SigningContext) -> Result<B256> {
    let inner = user_op_hash_inner(op)?;
    let hash = signing_hash_from_inner(inner, ctx);
    tracing::debug!(
        sender = %op.sender,
        nonce = %op.nonce,
        entry_point = %ctx.entry_point,
        chain_id = ctx.chain_id,
        signing_hash = %hash,
        "computed user operation hash"
    );
    Ok(hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, b256, bytes, Bytes};

    // Reference operation and hash published alongside the v0.6 bundler implementations.
    fn reference_op() -> UserOperation {
        UserOperation {
            sender: address!("1306b01bc3e4ad202612d3843387e94737673f53"),
            nonce: U256::from(8942u64),
            init_code: bytes!("6942069420694206942069420694206942069420"),
            call_data: bytes!("0000000000000000000000000000000000000000080085"),
            call_gas_limit: U256::from(10_000u64),
            verification_gas_limit: U256::from(100_000u64),
            pre_verification_gas: U256::from(100u64),
            max_fee_per_gas: U256::from(99_999u64),
            max_priority_fee_per_gas: U256::from(9_999_999u64),
            paymaster_and_data: bytes!(
                "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
            ),
            signature: bytes!("da0929f527cded8d0a1eaf2e8861d7f7e2d8160b7b13942f99dd367df4473a"),
        }
    }

    fn reference_ctx() -> SigningContext {
        SigningContext::new(address!("66a15edcc3b50a663e72f1457ffd49b9ae284ddc"), 1337)
    }

    #[test]
    fn test_matches_entry_point_v06_reference_hash() {
        let hash = signing_hash(&reference_op(), &reference_ctx()).unwrap();
        assert_eq!(hash, b256!("484add9e4d8c3172d11b5feb6a3cc712280e176d278027cfa02ee396eb28afa1"));
    }

    #[test]
    fn test_signature_does_not_affect_hash() {
        let mut op = reference_op();
        let before = signing_hash(&op, &reference_ctx()).unwrap();
        op.signature = Bytes::new();
        assert_eq!(signing_hash(&op, &reference_ctx()).unwrap(), before);
    }

    #[test]
    fn test_chain_id_is_bound() {
        let op = reference_op();
        let ctx = reference_ctx();
        let other = SigningContext::new(ctx.entry_point, 1);
        assert_ne!(signing_hash(&op, &ctx).unwrap(), signing_hash(&op, &other).unwrap());
    }

    #[test]
    fn test_entry_point_is_bound() {
        let op = reference_op();
        let ctx = reference_ctx();
        let other =
            SigningContext::new(address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789"), ctx.chain_id);
        assert_ne!(signing_hash(&op, &ctx).unwrap(), signing_hash(&op, &other).unwrap());
    }

    #[test]
    fn test_inner_hash_is_context_free() {
        let op = reference_op();
        let inner = user_op_hash_inner(&op).unwrap();
        assert_eq!(
            signing_hash_from_inner(inner, &reference_ctx()),
            signing_hash(&op, &reference_ctx()).unwrap()
        );
    }
}
