//! Independent verification of a signed user operation.
//!
//! Verification recomputes everything from the envelope and the caller's context: nothing
//! carried alongside the operation (a claimed hash, a claimed signer) is trusted.

use alloy_primitives::{Address, B256};
use k256::ecdsa::{RecoveryId, Signature, VerifyingKey};
use sponsored_op_types::{SigningContext, UserOperation};

use crate::errors::{Error, Result};
use crate::hasher::signing_hash;
use crate::signer::{address_of, personal_message_hash, SIGNATURE_LEN};

/// Successful verification.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Valid {
    pub signer: Address,
    pub signing_hash: B256,
}

fn split_signature(sig: &[u8]) -> Result<(Signature, RecoveryId)> {
    if sig.len() != SIGNATURE_LEN {
        return Err(Error::MalformedSignature(format!(
            "expected {SIGNATURE_LEN} bytes, got {}",
            sig.len()
        )));
    }
    // Accept both raw recovery ids and the legacy 27/28 encoding.
    let v = match sig[64] {
        v @ (0 | 1) => v,
        v @ (27 | 28) => v - 27,
        other => return Err(Error::MalformedSignature(format!("unsupported v value {other}"))),
    };
    let signature = Signature::from_slice(&sig[..64])
        .map_err(|_| Error::MalformedSignature("r or s is not a valid scalar".into()))?;
    if signature.normalize_s().is_some() {
        return Err(Error::MalformedSignature("non-canonical high-s signature".into()));
    }
    let recovery_id = RecoveryId::from_byte(v)
        .ok_or_else(|| Error::MalformedSignature(format!("unsupported v value {}", sig[64])))?;
    Ok((signature, recovery_id))
}

/// Recover the signer of a raw 32-byte prehash, with no message prefix applied.
pub fn recover_from_digest(prehash: B256, sig: &[u8]) -> Result<Address> {
    let (signature, recovery_id) = split_signature(sig)?;
    let key = VerifyingKey::recover_from_prehash(prehash.as_slice(), &signature, recovery_id)
        .map_err(|_| Error::MalformedSignature("public key recovery failed".into()))?;
    Ok(address_of(&key))
}

/// Recover the account that signed `op` under `ctx`.
pub fn recover_signer(op: &UserOperation, ctx: &SigningContext) -> Result<Address> {
    let hash = signing_hash(op, ctx)?;
    recover_from_digest(personal_message_hash(hash.as_slice()), &op.signature)
}

/// Check that `op` was signed by `expected` for `ctx`.
pub fn verify_operation(
    op: &UserOperation,
    ctx: &SigningContext,
    expected: Address,
) -> Result<Valid> {
    let hash = signing_hash(op, ctx)?;
    let recovered = recover_from_digest(personal_message_hash(hash.as_slice()), &op.signature)?;
    if recovered != expected {
        tracing::debug!(%expected, %recovered, signing_hash = %hash, "signature mismatch");
        return Err(Error::SignatureMismatch { expected, recovered });
    }
    tracing::debug!(signer = %recovered, signing_hash = %hash, "verified user operation");
    Ok(Valid { signer: recovered, signing_hash: hash })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::U256;

    use crate::signer::{sign_digest, SenderKey};

    const DEV_KEY: &str = "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn curve_order() -> U256 {
        U256::from_str_radix(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141",
            16,
        )
        .unwrap()
    }

    #[test]
    fn test_high_s_signature_is_rejected() {
        let key = SenderKey::from_hex(DEV_KEY).unwrap();
        let digest = B256::repeat_byte(0x42);
        let sig = sign_digest(&key, digest).unwrap();
        let prehash = personal_message_hash(digest.as_slice());
        assert_eq!(recover_from_digest(prehash, &sig).unwrap(), key.address());

        // Same signature with s replaced by n - s and the parity flipped.
        let s = U256::from_be_slice(&sig[32..64]);
        let mut malleated = sig.to_vec();
        malleated[32..64].copy_from_slice(&(curve_order() - s).to_be_bytes::<32>());
        malleated[64] = if sig[64] == 27 { 28 } else { 27 };

        assert_eq!(
            recover_from_digest(prehash, &malleated),
            Err(Error::MalformedSignature("non-canonical high-s signature".into()))
        );
    }

    #[test]
    fn test_wrong_length_is_malformed() {
        for len in [0usize, 64, 66, 130] {
            let sig = vec![1u8; len];
            assert!(matches!(
                recover_from_digest(B256::ZERO, &sig),
                Err(Error::MalformedSignature(_))
            ));
        }
    }

    #[test]
    fn test_unknown_v_is_malformed() {
        let mut sig = vec![1u8; 65];
        sig[64] = 29;
        assert!(matches!(
            recover_from_digest(B256::ZERO, &sig),
            Err(Error::MalformedSignature(_))
        ));
    }

    #[test]
    fn test_zero_scalars_are_malformed() {
        let mut sig = vec![0u8; 65];
        sig[64] = 27;
        assert!(matches!(
            recover_from_digest(B256::repeat_byte(1), &sig),
            Err(Error::MalformedSignature(_))
        ));
    }
}
