use alloy_primitives::{Address, U256};
use thiserror::Error;

/// Errors returned by encoding, signing, verification and sponsor preflight.
///
/// All of these are local and deterministic: retrying the same call with the same inputs yields
/// the same error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A required field is missing, zero where it must not be, or has the wrong width.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// Key material cannot be used as a secp256k1 signing key.
    #[error("invalid signing key")]
    InvalidKey,

    /// The signature recovers to a different account than the expected signer.
    #[error("signature mismatch: expected {expected}, recovered {recovered}")]
    SignatureMismatch { expected: Address, recovered: Address },

    /// Signature bytes have the wrong length or do not describe a recoverable signature.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),

    /// The sponsor cannot cover the operation's maximum cost.
    #[error("insufficient sponsor balance: required {required} wei, available {available} wei")]
    InsufficientSponsorBalance { required: U256, available: U256 },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;

pub(crate) fn malformed(msg: impl Into<String>) -> Error {
    Error::MalformedInput(msg.into())
}
