//! Native and ERC-20 balances

use alloy::primitives::{Address, U256};
use alloy::rpc::types::TransactionRequest;
use alloy_sol_types::{sol, SolCall};
use anyhow::{Context as _, Result};
use clap::Args;
use tracing::debug;

use super::{parse_address, required, Context};
use crate::config::Config;
use crate::ui::units::format_ether;

sol! {
    function balanceOf(address owner) external view returns (uint256 balance);
}

#[derive(Debug, Args)]
pub struct BalanceArgs {
    /// Account address
    #[arg(short, long)]
    pub address: Option<String>,

    /// Block number (0 = latest)
    #[arg(short, long, default_value_t = 0)]
    pub block: u64,

    /// Token symbol from the `[contracts]` config table
    #[arg(short, long)]
    pub token: Option<String>,
}

pub async fn run(args: BalanceArgs, ctx: &Context) -> Result<()> {
    let owner = parse_address(required(&args.address, "No address provided")?)?;
    let token = match args.token.as_deref() {
        Some(symbol) => Some((symbol, resolve_token(&ctx.config, symbol)?)),
        None => None,
    };

    let provider = ctx.provider().await?;
    let block = match args.block {
        0 => provider.block_number().await?,
        n => n,
    };

    match token {
        Some((symbol, token_address)) => {
            let request = TransactionRequest::default()
                .to(token_address)
                .input(encode_balance_of(owner).into());
            let output = provider
                .call(request, Some(block))
                .await
                .with_context(|| format!("balanceOf call to {} failed", token_address))?;
            let balance = balanceOfCall::abi_decode_returns(&output)
                .context("Malformed balanceOf return data")?;
            debug!(%token_address, block, "token balance");
            print!("{}", token_line(symbol, balance));
        }
        None => {
            let balance = provider.get_balance(owner, Some(block)).await?;
            print!("{}", native_line(block, balance));
        }
    }

    Ok(())
}

/// Resolve a token symbol through the config
pub fn resolve_token(config: &Config, symbol: &str) -> Result<Address> {
    let address = config
        .token_address(symbol)
        .with_context(|| format!("Token not found: {}", symbol))?;
    parse_address(address)
}

fn encode_balance_of(owner: Address) -> Vec<u8> {
    balanceOfCall { owner }.abi_encode()
}

pub fn native_line(block: u64, balance: U256) -> String {
    format!(
        "Balance at block {}: {} ({})\n",
        block,
        balance,
        format_ether(balance)
    )
}

pub fn token_line(symbol: &str, balance: U256) -> String {
    format!("{} balance: {} ({})\n", symbol, balance, format_ether(balance))
}
