//! Transaction lookup with optional ABI decoding of its call and logs

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::Args;
use tracing::debug;

use super::{load_table, parse_hash, required, Context};
use crate::domain::abi::SignatureTable;
use crate::infrastructure::ethereum::{RawReceipt, RawTransaction};
use crate::infrastructure::SlotDecoder;
use crate::ui::{format_call, format_event, format_receipt, format_transaction};

#[derive(Debug, Args)]
pub struct TransactionArgs {
    /// Transaction hash
    #[arg(long)]
    pub hash: Option<String>,

    /// ABI file used to decode the call and receipt logs
    #[arg(long)]
    pub abi: Option<PathBuf>,
}

pub async fn run(args: TransactionArgs, ctx: &Context) -> Result<()> {
    let hash = parse_hash(required(&args.hash, "No tx hash provided")?)?;
    let table = args.abi.as_deref().map(load_table).transpose()?;

    let provider = ctx.provider().await?;
    let tx = provider
        .get_transaction(hash)
        .await?
        .with_context(|| format!("Transaction not found: {}", hash))?;

    let receipt = if tx.is_pending() {
        debug!(%hash, "transaction is pending, skipping receipt");
        None
    } else {
        Some(
            provider
                .get_receipt(hash)
                .await?
                .with_context(|| format!("Receipt not found: {}", hash))?,
        )
    };

    print!("{}", render(&tx, receipt.as_ref(), table.as_ref()));
    Ok(())
}

/// Transaction, matched methods, matched events, then the receipt
pub fn render(
    tx: &RawTransaction,
    receipt: Option<&RawReceipt>,
    table: Option<&SignatureTable>,
) -> String {
    let decoder = SlotDecoder::new();
    let mut out = format_transaction(tx);

    if let Some(table) = table {
        for found in decoder.decode_calls(table, &tx.input) {
            out.push_str(&format_call(&found));
        }
    }

    if let Some(receipt) = receipt {
        if let Some(table) = table {
            for log in &receipt.logs {
                if let Some(found) = decoder.decode_log(table, log.address, &log.topics, &log.data)
                {
                    out.push_str(&format_event(&found, log.address));
                }
            }
        }
        out.push_str(&format_receipt(receipt));
    }

    out
}
