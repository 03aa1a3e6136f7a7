//! Off-chain tooling for gas-sponsored ERC-4337 (entry point v0.6) user operations.
//!
//! Pipeline: build a draft ([`builder`], [`calldata`], [`paymaster`]) → canonical encoding
//! ([`encoder`]) → signing hash ([`hasher`]) → personal-message signature ([`signer`]). The
//! [`verifier`] runs the same path in reverse for relayers and tests, and [`preflight`] checks
//! sponsor funding before submission.
//!
//! Every function here is synchronous and pure; nothing touches the network or global state.

pub mod builder;
pub mod calldata;
pub mod encoder;
pub mod errors;
pub mod hasher;
pub mod paymaster;
pub mod preflight;
pub mod signer;
pub mod verifier;


pub use builder::UserOperationBuilder;
pub use encoder::{encode_operation, ENCODED_OPERATION_LEN};
pub use errors::{Error, Result};
pub use hasher::{signing_hash, signing_hash_from_inner, user_op_hash_inner};
pub use paymaster::{pack_paymaster_and_data, unpack_paymaster_and_data, SponsorData};
pub use preflight::{check_sponsor_balance, required_prefund};
pub use signer::{
    personal_message_hash, sign_digest, sign_operation, SenderKey, SignedUserOperation,
};
pub use sponsored_op_types::{SigningContext, UserOperation};
pub use verifier::{recover_from_digest, recover_signer, verify_operation, Valid};
