//! Network and deployment configuration.
//!
//! Values come from flags, with environment fallbacks (a `.env` file is loaded first), and
//! optionally from the deployments JSON written by the deployment tooling:
//!
//! ```json
//! { "network": "sepolia", "deployments": { "paymaster": { "address": "0x..." } } }
//! ```
//!
//! Everything is resolved once into immutable values before any signing happens.

use std::{fs, path::Path};

use alloy_primitives::{Address, U256};
use anyhow::{anyhow, bail, Context, Result};
use serde_json::Value;
use sponsored_op_signer::SigningContext;
use sponsored_op_types::SEPOLIA_CHAIN_ID;

pub(crate) fn parse_address(s: &str) -> Result<Address, String> {
    s.trim().parse::<Address>().map_err(|e| format!("invalid address `{s}`: {e}"))
}

pub(crate) fn parse_u256(s: &str) -> Result<U256, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16),
        None => U256::from_str_radix(s, 10),
    };
    parsed.map_err(|e| format!("invalid integer `{s}`: {e}"))
}

/// Parse a decimal token amount such as `100` or `0.5` into base units.
pub(crate) fn parse_token_amount(amount: &str, decimals: u8) -> Result<U256> {
    let amount = amount.trim();
    let (whole, fraction) = amount.split_once('.').unwrap_or((amount, ""));
    if whole.is_empty() && fraction.is_empty() {
        bail!("empty token amount");
    }
    if fraction.len() > decimals as usize {
        bail!("token amount `{amount}` has more than {decimals} decimal places");
    }
    if !whole.chars().chain(fraction.chars()).all(|c| c.is_ascii_digit()) {
        bail!("token amount `{amount}` is not a decimal number");
    }

    let scale = U256::from(10u64).pow(U256::from(decimals));
    let whole = if whole.is_empty() { U256::ZERO } else { U256::from_str_radix(whole, 10)? };
    let fraction = if fraction.is_empty() {
        U256::ZERO
    } else {
        let padded = format!("{fraction:0<width$}", width = decimals as usize);
        U256::from_str_radix(&padded, 10)?
    };
    whole
        .checked_mul(scale)
        .and_then(|w| w.checked_add(fraction))
        .ok_or_else(|| anyhow!("token amount `{amount}` overflows uint256"))
}

/// Contract addresses recorded by the deployment tooling.
#[derive(Debug, Default)]
pub(crate) struct Deployments {
    root: Option<Value>,
}

impl Deployments {
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed reading {}", path.display()))?;
        let root: Value = serde_json::from_str(&text)
            .with_context(|| format!("failed parsing JSON in {}", path.display()))?;
        Ok(Self { root: Some(root) })
    }

    pub(crate) fn address(&self, key: &str) -> Result<Option<Address>> {
        let Some(raw) = self
            .root
            .as_ref()
            .and_then(|root| root.get("deployments"))
            .and_then(|d| d.get(key))
            .and_then(|entry| entry.get("address"))
        else {
            return Ok(None);
        };
        let raw = raw
            .as_str()
            .ok_or_else(|| anyhow!("deployments.{key}.address is not a string"))?;
        parse_address(raw).map(Some).map_err(|e| anyhow!("deployments.{key}.address: {e}"))
    }

    /// Explicit value first, then the deployments file; missing both is an error.
    pub(crate) fn resolve(
        &self,
        explicit: Option<Address>,
        key: &str,
        flag: &str,
    ) -> Result<Address> {
        if let Some(address) = explicit {
            return Ok(address);
        }
        self.address(key)?.ok_or_else(|| {
            anyhow!("missing {key} address: provide --{flag} or add deployments.{key}")
        })
    }
}

#[derive(Debug, clap::Args)]
pub(crate) struct NetworkArgs {
    /// Entry point contract the operation will be submitted to.
    #[arg(long, env = "ENTRYPOINT_ADDRESS", value_parser = parse_address)]
    pub(crate) entry_point: Option<Address>,

    /// Chain id of the target network.
    #[arg(long, env = "CHAIN_ID", default_value_t = SEPOLIA_CHAIN_ID)]
    pub(crate) chain_id: u64,
}

impl NetworkArgs {
    pub(crate) fn signing_context(&self, deployments: &Deployments) -> Result<SigningContext> {
        let entry_point = deployments.resolve(self.entry_point, "entry-point", "entry-point")?;
        if entry_point == Address::ZERO {
            bail!("entry point address must not be zero");
        }
        Ok(SigningContext::new(entry_point, self.chain_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_parse_token_amount() {
        let e18 = U256::from(10u64).pow(U256::from(18u64));
        assert_eq!(parse_token_amount("100", 18).unwrap(), U256::from(100u64) * e18);
        assert_eq!(parse_token_amount("0.5", 18).unwrap(), e18 / U256::from(2u64));
        assert_eq!(parse_token_amount("1.25", 2).unwrap(), U256::from(125u64));
        assert_eq!(parse_token_amount(".1", 1).unwrap(), U256::from(1u64));
        assert_eq!(parse_token_amount("7", 0).unwrap(), U256::from(7u64));
    }

    #[test]
    fn test_parse_token_amount_rejects_bad_input() {
        assert!(parse_token_amount("", 18).is_err());
        assert!(parse_token_amount(".", 18).is_err());
        assert!(parse_token_amount("1.234", 2).is_err());
        assert!(parse_token_amount("-1", 18).is_err());
        assert!(parse_token_amount("1e3", 18).is_err());
    }

    #[test]
    fn test_parse_u256_accepts_hex_and_decimal() {
        assert_eq!(parse_u256("255").unwrap(), U256::from(255u64));
        assert_eq!(parse_u256("0xff").unwrap(), U256::from(255u64));
        assert!(parse_u256("twelve").is_err());
    }

    #[test]
    fn test_deployments_resolution() {
        let deployments = Deployments {
            root: Some(serde_json::json!({
                "network": "sepolia",
                "deployments": {
                    "paymaster": { "address": "0x00000000000000000000000000000000000000aa" },
                    "broken": { "address": 7 }
                }
            })),
        };
        let paymaster = address!("00000000000000000000000000000000000000aa");
        let explicit = address!("00000000000000000000000000000000000000bb");

        assert_eq!(deployments.resolve(None, "paymaster", "paymaster").unwrap(), paymaster);
        assert_eq!(
            deployments.resolve(Some(explicit), "paymaster", "paymaster").unwrap(),
            explicit
        );
        assert!(deployments.resolve(None, "test-token", "token").is_err());
        assert!(deployments.address("broken").is_err());
    }

    #[test]
    fn test_empty_deployments_resolve_nothing() {
        let deployments = Deployments::load(None).unwrap();
        assert_eq!(deployments.address("paymaster").unwrap(), None);
    }
}
