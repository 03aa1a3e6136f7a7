//! Shared types for sponsored user operations.
//!
//! Everything here is plain data: the fixed-field ERC-4337 (entry point v0.6) envelope and the
//! immutable signing context that binds a signature to one entry point on one network.

pub mod context;
pub mod operation;

pub use context::{SigningContext, ENTRY_POINT_V0_6, MAINNET_CHAIN_ID, SEPOLIA_CHAIN_ID};
pub use operation::UserOperation;
