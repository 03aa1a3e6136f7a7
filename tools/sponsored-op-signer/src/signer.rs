//! Personal-message signing of user operation hashes.
//!
//! The signing hash is not signed raw. It is wrapped as an EIP-191 personal message
//! (`"\x19Ethereum Signed Message:\n32" || hash`), re-hashed, and that digest is signed. This is
//! the `signMessage` convention wallets use and what a v0.6 `SimpleAccount` checks with
//! `toEthSignedMessageHash`.

use core::fmt;

use alloy_primitives::{Address, Bytes, B256};
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use sponsored_op_types::{SigningContext, UserOperation};

use crate::encoder::keccak256_bytes;
use crate::errors::{Error, Result};
use crate::hasher::signing_hash;

/// Prefix of an EIP-191 version `0x45` message; the decimal message length follows it.
pub const PERSONAL_MESSAGE_PREFIX: &[u8] = b"\x19Ethereum Signed Message:\n";

/// Length of an `r || s || v` signature.
pub const SIGNATURE_LEN: usize = 65;

/// Hash `message` the way wallets do for ad-hoc message signing.
pub fn personal_message_hash(message: &[u8]) -> B256 {
    let len = message.len().to_string();
    let mut buf = Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + len.len() + message.len());
    buf.extend_from_slice(PERSONAL_MESSAGE_PREFIX);
    buf.extend_from_slice(len.as_bytes());
    buf.extend_from_slice(message);
    keccak256_bytes(&buf)
}

pub(crate) fn address_of(key: &VerifyingKey) -> Address {
    let point = key.to_encoded_point(false);
    // Skip the 0x04 SEC1 tag; the address is the low 20 bytes of keccak256(x || y).
    let hash = keccak256_bytes(&point.as_bytes()[1..]);
    Address::from_slice(&hash[12..])
}

/// secp256k1 key of an operation's sender.
#[derive(Clone)]
pub struct SenderKey {
    inner: SigningKey,
    address: Address,
}

impl SenderKey {
    /// Load a 32-byte big-endian secret scalar.
    pub fn from_slice(secret: &[u8]) -> Result<Self> {
        if secret.len() != 32 {
            return Err(Error::InvalidKey);
        }
        let inner = SigningKey::from_slice(secret).map_err(|_| Error::InvalidKey)?;
        let address = address_of(inner.verifying_key());
        Ok(Self { inner, address })
    }

    /// Load a hex secret, with or without a `0x` prefix.
    pub fn from_hex(secret: &str) -> Result<Self> {
        let trimmed = secret.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| Error::InvalidKey)?;
        Self::from_slice(&bytes)
    }

    /// Account address controlled by this key.
    pub fn address(&self) -> Address {
        self.address
    }
}

impl fmt::Debug for SenderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SenderKey").field("address", &self.address).finish_non_exhaustive()
    }
}

/// Sign a 32-byte digest under the personal-message convention.
///
/// Returns `r || s || v` with `v` in `{27, 28}`.
pub fn sign_digest(key: &SenderKey, digest: B256) -> Result<Bytes> {
    let prehash = personal_message_hash(digest.as_slice());
    let (mut signature, mut recovery_id): (Signature, RecoveryId) = key
        .inner
        .sign_prehash_recoverable(prehash.as_slice())
        .map_err(|_| Error::InvalidKey)?;
    if let Some(normalized) = signature.normalize_s() {
        signature = normalized;
        recovery_id = RecoveryId::new(!recovery_id.is_y_odd(), recovery_id.is_x_reduced());
    }

    let (r, s) = signature.split_bytes();
    let mut sig_bytes = Vec::with_capacity(SIGNATURE_LEN);
    sig_bytes.extend_from_slice(r.as_slice());
    sig_bytes.extend_from_slice(s.as_slice());
    sig_bytes.push(27 + recovery_id.to_byte());
    Ok(Bytes::from(sig_bytes))
}

/// An operation whose signature has been produced and must no longer change.
///
/// There is no mutable access. `into_draft` is the only way back to an editable operation and it
/// drops the signature.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignedUserOperation {
    operation: UserOperation,
    signing_hash: B256,
    signer: Address,
}

impl SignedUserOperation {
    pub fn operation(&self) -> &UserOperation {
        &self.operation
    }

    pub fn signing_hash(&self) -> B256 {
        self.signing_hash
    }

    pub fn signer(&self) -> Address {
        self.signer
    }

    /// Hand the envelope to a submission collaborator.
    pub fn into_operation(self) -> UserOperation {
        self.operation
    }

    /// Discard the signature and return the editable draft.
    pub fn into_draft(self) -> UserOperation {
        self.operation.without_signature()
    }
}

/// Sign `op` for `ctx`, replacing any existing signature.
pub fn sign_operation(
    op: UserOperation,
    key: &SenderKey,
    ctx: &SigningContext,
) -> Result<SignedUserOperation> {
    let hash = signing_hash(&op, ctx)?;
    let signature = sign_digest(key, hash)?;
    tracing::debug!(signer = %key.address(), signing_hash = %hash, "signed user operation");

    Ok(SignedUserOperation {
        operation: UserOperation { signature, ..op },
        signing_hash: hash,
        signer: key.address(),
    })
}
