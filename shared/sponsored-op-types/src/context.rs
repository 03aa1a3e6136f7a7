use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Ethereum mainnet.
pub const MAINNET_CHAIN_ID: u64 = 1;

/// Sepolia testnet, the network the sponsored-transfer flow is exercised on.
pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

/// Canonical ERC-4337 v0.6 entry point deployment.
pub const ENTRY_POINT_V0_6: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");

/// Domain an operation is signed for: the entry point that will execute it and the chain id.
///
/// Passed by value into every hashing, signing and verifying call. A signature produced under one
/// context does not verify under another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SigningContext {
    pub entry_point: Address,
    pub chain_id: u64,
}

impl SigningContext {
    pub const fn new(entry_point: Address, chain_id: u64) -> Self {
        Self { entry_point, chain_id }
    }

    pub const fn sepolia(entry_point: Address) -> Self {
        Self::new(entry_point, SEPOLIA_CHAIN_ID)
    }
}
