//! Sender key loading.

use std::{fs, path::PathBuf};

use anyhow::{anyhow, Context, Result};
use sponsored_op_signer::SenderKey;

#[derive(Debug, clap::Args)]
pub(crate) struct KeyArgs {
    /// Path to a file containing the sender private key (hex, optionally 0x-prefixed).
    #[arg(long, env = "PRIV_KEY_PATH", conflicts_with = "private_key")]
    pub(crate) private_key_path: Option<PathBuf>,

    /// Sender private key (hex string, 0x...).
    #[arg(long, env = "PKEY", hide_env_values = true, conflicts_with = "private_key_path")]
    pub(crate) private_key: Option<String>,
}

pub(crate) fn load_sender_key(args: &KeyArgs) -> Result<SenderKey> {
    if let Some(path) = &args.private_key_path {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed reading key file {}", path.display()))?;
        let key = SenderKey::from_hex(&contents)
            .with_context(|| format!("key file {} does not hold a valid key", path.display()))?;
        tracing::info!(signer = %key.address(), "loaded sender key from {}", path.display());
        return Ok(key);
    }

    if let Some(hex_key) = &args.private_key {
        let key = SenderKey::from_hex(hex_key).context("--private-key is not a valid key")?;
        tracing::info!(signer = %key.address(), "using sender key from --private-key");
        return Ok(key);
    }

    Err(anyhow!(
        "missing sender key: provide --private-key-path or --private-key \
         (or set PRIV_KEY_PATH/PKEY)"
    ))
}
