//! `paymasterAndData` micro-format.
//!
//! Layout: `bytes20 paymaster || sponsor payload`. There is no length prefix; the boundary is
//! always at byte 20. The sponsored-transfer paymaster expects the payload to be the sponsor's
//! 20-byte wallet address.

use alloy_primitives::{Address, Bytes};

use crate::errors::{malformed, Result};

/// Width of the paymaster address at the head of `paymasterAndData`.
pub const PAYMASTER_ADDRESS_LEN: usize = 20;

/// Decoded `paymasterAndData`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SponsorData {
    pub paymaster: Address,
    pub sponsor: Bytes,
}

impl SponsorData {
    /// The sponsor payload as a wallet address, if it is exactly 20 bytes.
    pub fn sponsor_address(&self) -> Option<Address> {
        (self.sponsor.len() == 20).then(|| Address::from_slice(&self.sponsor))
    }
}

/// Concatenate the paymaster address and sponsor payload.
pub fn pack_paymaster_and_data(paymaster: Address, sponsor: &[u8]) -> Bytes {
    let mut buf = Vec::with_capacity(PAYMASTER_ADDRESS_LEN + sponsor.len());
    buf.extend_from_slice(paymaster.as_slice());
    buf.extend_from_slice(sponsor);
    Bytes::from(buf)
}

/// Split `paymasterAndData`; `None` means the operation is not sponsored.
pub fn unpack_paymaster_and_data(data: &[u8]) -> Result<Option<SponsorData>> {
    if data.is_empty() {
        return Ok(None);
    }
    if data.len() < PAYMASTER_ADDRESS_LEN {
        return Err(malformed(format!(
            "paymasterAndData is {} bytes, shorter than a paymaster address",
            data.len()
        )));
    }
    Ok(Some(SponsorData {
        paymaster: Address::from_slice(&data[..PAYMASTER_ADDRESS_LEN]),
        sponsor: Bytes::copy_from_slice(&data[PAYMASTER_ADDRESS_LEN..]),
    }))
}
