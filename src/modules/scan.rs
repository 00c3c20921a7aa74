//! Block range scan for transactions to or from an address

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::{debug, info};

use super::{parse_address, required, Context};
use crate::infrastructure::ethereum::RawTransaction;
use crate::infrastructure::EthereumProvider;
use crate::ui::{scan_header, scan_row};

#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Address to look for
    #[arg(short, long)]
    pub address: Option<String>,

    /// First block to scan (default 1)
    #[arg(short, long, default_value_t = 0)]
    pub block: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    To,
    From,
}

pub async fn run(args: ScanArgs, direction: Direction, ctx: &Context) -> Result<()> {
    let address = parse_address(required(&args.address, "No address provided")?)?;
    let address = format!("{:#x}", address);
    let start = args.block.max(1);

    let provider = ctx.provider().await?;
    let latest = provider.block_number().await?;
    info!(start, latest, ?direction, "scanning blocks");

    print!("{}", scan_header());
    for number in start..=latest {
        let block = provider
            .get_block(number)
            .await?
            .with_context(|| format!("Block not found: {}", number))?;
        debug!(number, txs = block.transactions.len(), "scanned block");

        for tx in &block.transactions {
            let counterparty = counterparty(provider.as_ref(), tx, direction).await?;
            if matches_address(counterparty.as_deref(), &address) {
                print!("{}", scan_row(number, &tx.hash));
            }
        }
    }

    Ok(())
}

/// The address a transaction is compared against
///
/// Contract creations have no `to`, so the receipt's contract address is used.
async fn counterparty(
    provider: &dyn EthereumProvider,
    tx: &RawTransaction,
    direction: Direction,
) -> Result<Option<String>> {
    match direction {
        Direction::From => Ok(Some(tx.from.clone())),
        Direction::To => match &tx.to {
            Some(to) => Ok(Some(to.clone())),
            None => {
                let hash = tx.hash.parse().context("Invalid transaction hash")?;
                let receipt = provider.get_receipt(hash).await?;
                Ok(receipt.and_then(|r| r.contract_address))
            }
        },
    }
}

/// Case-insensitive comparison of hex addresses
pub fn matches_address(candidate: Option<&str>, address: &str) -> bool {
    candidate.is_some_and(|c| c.trim().eq_ignore_ascii_case(address))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_address() {
        let address = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
        assert!(matches_address(
            Some("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            address
        ));
        assert!(!matches_address(
            Some("0xdac17f958d2ee523a2206206994597c13d831ec7"),
            address
        ));
        assert!(!matches_address(None, address));
    }

    #[test]
    fn test_normalized_address_format() {
        let address = parse_address("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48").unwrap();
        assert_eq!(
            format!("{:#x}", address),
            "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"
        );
    }
}
