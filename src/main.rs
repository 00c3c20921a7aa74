use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use ethutil::config;
use ethutil::modules::{self, Command, Context};

#[derive(Debug, Parser)]
#[command(
    name = "ethutil",
    version,
    about = "Ethereum node CLI utility with ABI-driven call and event decoding"
)]
struct Args {
    /// Node endpoint: http(s)/ws(s) URL or IPC path (overrides config `node_uri`)
    #[arg(long, global = true)]
    rpc: Option<String>,

    /// Config file (defaults to ~/.config/ethutil/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = config::load(args.config.as_deref())?;
    let ctx = Context::new(config, args.rpc);

    modules::run(args.command, &ctx).await
}
