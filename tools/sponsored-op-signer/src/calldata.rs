//! Call-data helpers for the sponsored token transfer flow.
//!
//! A v0.6 `SimpleAccount` executes `execute(dest, value, func)`; for a token transfer `func` is the
//! ERC-20 `transfer(to, amount)` call.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall};

use crate::errors::{malformed, Result};

sol! {
    /// ERC-20 transfer.
    function transfer(address to, uint256 amount) external returns (bool);

    /// `SimpleAccount` single-call entry.
    function execute(address dest, uint256 value, bytes func) external;
}

/// `transfer(to, amount)` call data.
pub fn erc20_transfer(to: Address, amount: U256) -> Bytes {
    Bytes::from(transferCall { to, amount }.abi_encode())
}

/// `execute(dest, value, func)` call data.
pub fn simple_account_execute(dest: Address, value: U256, func: Bytes) -> Bytes {
    Bytes::from(executeCall { dest, value, func }.abi_encode())
}

/// Account call data that transfers `amount` of `token` to `to`, with no native value attached.
pub fn sponsored_transfer_call_data(token: Address, to: Address, amount: U256) -> Bytes {
    simple_account_execute(token, U256::ZERO, erc20_transfer(to, amount))
}

/// Decode `execute(dest, value, func)` call data.
pub fn decode_simple_account_execute(data: &[u8]) -> Result<(Address, U256, Bytes)> {
    let call = executeCall::abi_decode(data, true)
        .map_err(|e| malformed(format!("callData is not an execute call: {e}")))?;
    Ok((call.dest, call.value, call.func))
}

/// Decode `transfer(to, amount)` call data.
pub fn decode_erc20_transfer(data: &[u8]) -> Result<(Address, U256)> {
    let call = transferCall::abi_decode(data, true)
        .map_err(|e| malformed(format!("not a transfer call: {e}")))?;
    Ok((call.to, call.amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const TOKEN: Address = address!("2222222222222222222222222222222222222222");
    const RECIPIENT: Address = address!("3333333333333333333333333333333333333333");

    #[test]
    fn test_selectors() {
        assert_eq!(transferCall::SELECTOR, [0xa9, 0x05, 0x9c, 0xbb]);
        assert_eq!(executeCall::SELECTOR, [0xb6, 0x1d, 0x27, 0xf6]);
    }

    #[test]
    fn test_transfer_layout() {
        let data = erc20_transfer(RECIPIENT, U256::from(100u64));
        assert_eq!(data.len(), 4 + 32 + 32);
        assert_eq!(&data[16..36], RECIPIENT.as_slice());
        assert_eq!(data[67], 100);
    }

    #[test]
    fn test_sponsored_transfer_wraps_transfer_in_execute() {
        let amount = U256::from(100u64) * U256::from(10u64).pow(U256::from(18u64));
        let data = sponsored_transfer_call_data(TOKEN, RECIPIENT, amount);
        assert_eq!(&data[..4], executeCall::SELECTOR.as_slice());

        let (dest, value, func) = decode_simple_account_execute(&data).unwrap();
        assert_eq!(dest, TOKEN);
        assert_eq!(value, U256::ZERO);
        assert_eq!(decode_erc20_transfer(&func).unwrap(), (RECIPIENT, amount));
    }

    #[test]
    fn test_decode_rejects_foreign_call_data() {
        let data = erc20_transfer(RECIPIENT, U256::from(1u64));
        assert!(matches!(
            decode_simple_account_execute(&data),
            Err(crate::Error::MalformedInput(_))
        ));
    }
}
