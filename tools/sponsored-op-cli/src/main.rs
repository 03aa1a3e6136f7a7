use std::path::{Path, PathBuf};

use alloy_primitives::{Address, U256};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::json;
use sponsored_op_signer::{
    check_sponsor_balance, personal_message_hash, required_prefund, sign_operation, signing_hash,
    unpack_paymaster_and_data, user_op_hash_inner, verify_operation, UserOperationBuilder,
};

mod config;
mod files;
mod keys;

use config::{parse_address, parse_token_amount, parse_u256, Deployments, NetworkArgs};
use files::{emit_json, read_operation};
use keys::{load_sender_key, KeyArgs};

/// Build, hash, sign and verify gas-sponsored ERC-4337 user operations.
///
/// Submission to a bundler or the entry point is left to other tooling: this binary only produces
/// and checks the signed operation JSON.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Deployments JSON written by the deployment tooling (eg, deployments.sepolia.json).
    ///
    /// Used to resolve contract addresses that are not given explicitly.
    #[arg(long, global = true, env = "DEPLOYMENTS_PATH")]
    deployments_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build an unsigned operation that transfers tokens from the sender account.
    Build(BuildArgs),
    /// Print the inner hash and signing hash of an operation.
    Hash(HashArgs),
    /// Sign an operation with the sender key.
    Sign(SignArgs),
    /// Verify an operation's signature against an expected signer.
    Verify(VerifyArgs),
    /// Check that a sponsor balance covers the operation's maximum cost.
    Preflight(PreflightArgs),
}

#[derive(clap::Args, Debug)]
struct BuildArgs {
    /// Smart account that sends the operation.
    #[arg(long, env = "SIMPLE_ACCOUNT_ADDRESS", value_parser = parse_address)]
    account: Option<Address>,

    /// ERC-20 token to transfer.
    #[arg(long, env = "TEST_TOKEN_ADDRESS", value_parser = parse_address)]
    token: Option<Address>,

    /// Recipient of the transfer.
    #[arg(long, env = "WALLET_B_ADDRESS", value_parser = parse_address)]
    recipient: Address,

    /// Amount in whole tokens (eg, 100 or 0.5).
    #[arg(long)]
    amount: String,

    /// Token decimals used to scale `--amount`.
    #[arg(long, default_value_t = 18)]
    decimals: u8,

    /// Account nonce, as assigned by the entry point.
    #[arg(long, default_value = "0", value_parser = parse_u256)]
    nonce: U256,

    /// Paymaster contract that sponsors gas.
    #[arg(long, env = "PAYMASTER_ADDRESS", value_parser = parse_address)]
    paymaster: Option<Address>,

    /// Wallet whose paymaster deposit pays for gas.
    #[arg(long, env = "WALLET_X_ADDRESS", value_parser = parse_address)]
    sponsor: Address,

    #[arg(long, value_parser = parse_u256)]
    call_gas_limit: Option<U256>,

    #[arg(long, value_parser = parse_u256)]
    verification_gas_limit: Option<U256>,

    #[arg(long, value_parser = parse_u256)]
    pre_verification_gas: Option<U256>,

    /// Max fee per gas in wei.
    #[arg(long, value_parser = parse_u256)]
    max_fee_per_gas: Option<U256>,

    /// Max priority fee per gas in wei.
    #[arg(long, value_parser = parse_u256)]
    max_priority_fee_per_gas: Option<U256>,

    /// Where to write the operation JSON (stdout if omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct HashArgs {
    /// Operation JSON file.
    input: PathBuf,

    #[command(flatten)]
    network: NetworkArgs,
}

#[derive(clap::Args, Debug)]
struct SignArgs {
    /// Operation JSON file.
    input: PathBuf,

    #[command(flatten)]
    network: NetworkArgs,

    #[command(flatten)]
    key: KeyArgs,

    /// Where to write the signed operation JSON (stdout if omitted).
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
struct VerifyArgs {
    /// Operation JSON file.
    input: PathBuf,

    #[command(flatten)]
    network: NetworkArgs,

    /// Address that must have signed the operation.
    #[arg(long, env = "WALLET_A_ADDRESS", value_parser = parse_address)]
    expected_signer: Address,
}

#[derive(clap::Args, Debug)]
struct PreflightArgs {
    /// Operation JSON file.
    input: PathBuf,

    /// Sponsor's current paymaster deposit in wei.
    #[arg(long, value_parser = parse_u256)]
    sponsor_balance: U256,
}

fn main() -> Result<()> {
    // Environment fallbacks for flags come from `.env` when present.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let deployments = Deployments::load(cli.deployments_path.as_deref())?;

    match cli.command {
        Command::Build(args) => build(&args, &deployments),
        Command::Hash(args) => hash(&args, &deployments),
        Command::Sign(args) => sign(&args, &deployments),
        Command::Verify(args) => verify(&args, &deployments),
        Command::Preflight(args) => preflight(&args),
    }
}

fn build(args: &BuildArgs, deployments: &Deployments) -> Result<()> {
    let account = deployments.resolve(args.account, "simple-account", "account")?;
    let token = deployments.resolve(args.token, "test-token", "token")?;
    let paymaster = deployments.resolve(args.paymaster, "paymaster", "paymaster")?;
    let amount = parse_token_amount(&args.amount, args.decimals)?;

    let mut builder = UserOperationBuilder::new()
        .sender(account)
        .nonce(args.nonce)
        .token_transfer(token, args.recipient, amount)
        .sponsored_by(paymaster, args.sponsor);
    if let Some(gas) = args.call_gas_limit {
        builder = builder.call_gas_limit(gas);
    }
    if let Some(gas) = args.verification_gas_limit {
        builder = builder.verification_gas_limit(gas);
    }
    if let Some(gas) = args.pre_verification_gas {
        builder = builder.pre_verification_gas(gas);
    }
    if let Some(fee) = args.max_fee_per_gas {
        builder = builder.max_fee_per_gas(fee);
    }
    if let Some(fee) = args.max_priority_fee_per_gas {
        builder = builder.max_priority_fee_per_gas(fee);
    }
    let op = builder.build().context("failed building user operation")?;

    if !op.fee_market_consistent() {
        tracing::warn!(
            max_fee_per_gas = %op.max_fee_per_gas,
            max_priority_fee_per_gas = %op.max_priority_fee_per_gas,
            "priority fee exceeds max fee; the entry point will cap it"
        );
    }
    tracing::info!(
        %account, %token, recipient = %args.recipient, %amount, %paymaster, sponsor = %args.sponsor,
        "built sponsored transfer"
    );
    emit_json(&op, args.out.as_deref())
}

fn hash(args: &HashArgs, deployments: &Deployments) -> Result<()> {
    let ctx = args.network.signing_context(deployments)?;
    let op = read_operation(&args.input)?;
    let inner = user_op_hash_inner(&op)?;
    let signing = signing_hash(&op, &ctx)?;

    emit_json(
        &json!({
            "entryPoint": ctx.entry_point,
            "chainId": ctx.chain_id,
            "userOpHashInner": inner,
            "signingHash": signing,
            "personalMessageHash": personal_message_hash(signing.as_slice()),
        }),
        None,
    )
}

fn sign(args: &SignArgs, deployments: &Deployments) -> Result<()> {
    let ctx = args.network.signing_context(deployments)?;
    let key = load_sender_key(&args.key)?;
    let op = read_operation(&args.input)?;
    if op.is_signed() {
        tracing::warn!("replacing existing signature in {}", args.input.display());
    }

    let signed = sign_operation(op, &key, &ctx)
        .with_context(|| format!("failed signing {}", args.input.display()))?;
    tracing::info!(
        signer = %signed.signer(),
        signing_hash = %signed.signing_hash(),
        chain_id = ctx.chain_id,
        "signed user operation"
    );
    emit_json(signed.operation(), args.out.as_deref())
}

fn verify(args: &VerifyArgs, deployments: &Deployments) -> Result<()> {
    let ctx = args.network.signing_context(deployments)?;
    let op = read_operation(&args.input)?;
    let sponsor = unpack_paymaster_and_data(&op.paymaster_and_data)
        .with_context(|| format!("{} has malformed paymasterAndData", args.input.display()))?;

    let valid = verify_operation(&op, &ctx, args.expected_signer)
        .with_context(|| format!("{} failed verification", args.input.display()))?;

    emit_json(
        &json!({
            "valid": true,
            "signer": valid.signer,
            "signingHash": valid.signing_hash,
            "paymaster": sponsor.as_ref().map(|s| s.paymaster),
            "sponsor": sponsor.as_ref().map(|s| s.sponsor.clone()),
        }),
        None,
    )
}

fn preflight(args: &PreflightArgs) -> Result<()> {
    let op = read_operation(&args.input)?;
    require_sponsor(&op, &args.input)?;
    check_sponsor_balance(&op, args.sponsor_balance)
        .context("sponsor precondition not met; fund the paymaster deposit before submitting")?;

    emit_json(
        &json!({
            "required": required_prefund(&op),
            "available": args.sponsor_balance,
        }),
        None,
    )
}

fn require_sponsor(op: &sponsored_op_types::UserOperation, path: &Path) -> Result<()> {
    if unpack_paymaster_and_data(&op.paymaster_and_data)?.is_none() {
        anyhow::bail!("{} is not sponsored: paymasterAndData is empty", path.display());
    }
    Ok(())
}
