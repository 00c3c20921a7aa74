//! Live log subscription for one address

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;
use tracing::{info, warn};

use super::{load_table, parse_address, required, Context};
use crate::domain::abi::SignatureTable;
use crate::infrastructure::ethereum::RawLog;
use crate::infrastructure::SlotDecoder;
use crate::ui::{format_event, format_log};

#[derive(Debug, Args)]
pub struct SubscribeArgs {
    /// Contract address emitting the logs
    #[arg(short, long)]
    pub address: Option<String>,

    /// Block to start from
    #[arg(short, long, default_value_t = 0)]
    pub block: u64,

    /// ABI file used to decode matching events
    #[arg(long)]
    pub abi: Option<PathBuf>,
}

pub async fn run(args: SubscribeArgs, ctx: &Context) -> Result<()> {
    let address = parse_address(required(&args.address, "No address provided")?)?;
    let table = args.abi.as_deref().map(load_table).transpose()?;

    let provider = ctx.provider().await?;
    if !provider.supports_subscriptions() {
        bail!(
            "{} does not support subscriptions, use a ws:// URL or an IPC path",
            provider.endpoint_name()
        );
    }

    let mut logs = provider.subscribe_logs(address, args.block).await?;
    info!(%address, from_block = args.block, "subscribed to logs");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("interrupted, closing subscription");
                return Ok(());
            }
            log = logs.recv() => match log {
                Some(log) => print!("{}", render(&log, table.as_ref())),
                None => {
                    warn!("log stream ended");
                    bail!("Subscription closed by the node");
                }
            }
        }
    }
}

/// A log, preceded by its decoded event when the ABI knows topic-0
pub fn render(log: &RawLog, table: Option<&SignatureTable>) -> String {
    let mut out = String::new();
    if let Some(table) = table {
        if let Some(found) =
            SlotDecoder::new().decode_log(table, log.address, &log.topics, &log.data)
        {
            out.push_str(&format_event(&found, log.address));
        }
    }
    out.push_str(&format_log(log));
    out
}
