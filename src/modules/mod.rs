//! CLI commands
//!
//! Each command owns its clap arguments and an async `run`. Pure helpers are
//! kept next to them so output can be checked without a node.

pub mod balance;
pub mod block;
pub mod decode;
pub mod scan;
pub mod signatures;
pub mod subscribe;
pub mod transaction;
pub mod validate;

use std::path::Path;

use alloy::primitives::{Address, B256};
use anyhow::{bail, Context as _, Result};
use clap::Subcommand;
use tracing::{debug, info};

use crate::config::Config;
use crate::domain::abi::SignatureTable;
use crate::infrastructure::{create_provider, AbiLoader, EthereumProvider, ProviderConfig};

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Native or token balance of an address
    #[command(visible_alias = "bal")]
    Balance(balance::BalanceArgs),

    /// Show a block by number or hash
    #[command(visible_alias = "blk")]
    Block(block::BlockArgs),

    /// Show a transaction, its receipt and decoded calls/events
    #[command(visible_alias = "tx")]
    Transaction(transaction::TransactionArgs),

    /// List transactions sent to an address
    #[command(alias = "transactions-to-address")]
    Scan(scan::ScanArgs),

    /// List transactions sent from an address
    #[command(alias = "transactions-from-address")]
    ScanFrom(scan::ScanArgs),

    /// List the signatures in an ABI file
    #[command(visible_alias = "sig")]
    Signatures(signatures::SignaturesArgs),

    /// Check an address and print its checksummed form
    #[command(visible_alias = "val")]
    Validate(validate::ValidateArgs),

    /// Stream logs emitted by an address
    #[command(visible_alias = "sub")]
    Subscribe(subscribe::SubscribeArgs),

    /// Decode a raw signed transaction
    #[command(visible_alias = "dec")]
    Decode(decode::DecodeArgs),
}

/// Shared state for command execution
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    /// `--rpc` override of the configured node URI
    pub rpc: Option<String>,
}

impl Context {
    pub fn new(config: Config, rpc: Option<String>) -> Self {
        Self { config, rpc }
    }

    pub fn node_uri(&self) -> &str {
        self.rpc
            .as_deref()
            .map(str::trim)
            .filter(|uri| !uri.is_empty())
            .unwrap_or_else(|| self.config.node_uri())
    }

    /// Connect to the node; only commands that need one call this
    pub async fn provider(&self) -> Result<Box<dyn EthereumProvider>> {
        let config = ProviderConfig::from_uri(self.node_uri())?;
        let endpoint = config.display();
        let provider = create_provider(config)
            .await
            .with_context(|| format!("Failed to connect to {}", endpoint))?;
        info!(endpoint = %provider.endpoint_name(), "connected");
        Ok(provider)
    }
}

pub async fn run(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Balance(args) => balance::run(args, ctx).await,
        Command::Block(args) => block::run(args, ctx).await,
        Command::Transaction(args) => transaction::run(args, ctx).await,
        Command::Scan(args) => scan::run(args, scan::Direction::To, ctx).await,
        Command::ScanFrom(args) => scan::run(args, scan::Direction::From, ctx).await,
        Command::Signatures(args) => signatures::run(args),
        Command::Validate(args) => validate::run(args),
        Command::Subscribe(args) => subscribe::run(args, ctx).await,
        Command::Decode(args) => decode::run(args),
    }
}

/// Load an ABI file and build its signature table
pub fn load_table(path: &Path) -> Result<SignatureTable> {
    let fields = AbiLoader::load(path)?;
    let table = SignatureTable::build(&fields);
    debug!(
        path = %path.display(),
        entries = table.len(),
        collisions = table.collisions().len(),
        "built signature table"
    );
    Ok(table)
}

/// Unwrap a flag value the command cannot run without
pub(crate) fn required<'a>(value: &'a Option<String>, message: &str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => bail!("{}", message),
    }
}

pub(crate) fn parse_address(input: &str) -> Result<Address> {
    input
        .trim()
        .parse::<Address>()
        .with_context(|| format!("Invalid address: {}", input))
}

pub(crate) fn parse_hash(input: &str) -> Result<B256> {
    input
        .trim()
        .parse::<B256>()
        .with_context(|| format!("Invalid hash: {}", input))
}
