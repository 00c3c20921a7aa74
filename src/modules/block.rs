use alloy::primitives::B256;
use anyhow::{bail, Context as _, Result};
use clap::Args;

use super::{parse_hash, Context};
use crate::ui::format_block;

#[derive(Debug, Args)]
pub struct BlockArgs {
    /// Block number
    #[arg(short, long, default_value_t = 0)]
    pub block: u64,

    /// Block hash
    #[arg(long)]
    pub hash: Option<String>,
}

/// Which block to fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockSelector {
    Number(u64),
    Hash(B256),
}

impl BlockSelector {
    /// Exactly one of a non-zero number or a hash must be given
    pub fn from_args(args: &BlockArgs) -> Result<Self> {
        let hash = args.hash.as_deref().map(str::trim).filter(|h| !h.is_empty());
        match (args.block, hash) {
            (0, None) => bail!("Either block number or block hash must be provided"),
            (n, Some(_)) if n != 0 => {
                bail!("Ambiguous: only a block number or a block hash should be provided")
            }
            (_, Some(hash)) => Ok(BlockSelector::Hash(parse_hash(hash)?)),
            (n, None) => Ok(BlockSelector::Number(n)),
        }
    }
}

pub async fn run(args: BlockArgs, ctx: &Context) -> Result<()> {
    let selector = BlockSelector::from_args(&args)?;
    let provider = ctx.provider().await?;

    let block = match selector {
        BlockSelector::Number(number) => provider.get_block(number).await?,
        BlockSelector::Hash(hash) => provider.get_block_by_hash(hash).await?,
    }
    .with_context(|| format!("Block not found: {:?}", selector))?;

    print!("{}", format_block(&block));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(block: u64, hash: Option<&str>) -> BlockArgs {
        BlockArgs {
            block,
            hash: hash.map(str::to_string),
        }
    }

    #[test]
    fn test_selector_by_number() {
        assert_eq!(
            BlockSelector::from_args(&args(42, None)).unwrap(),
            BlockSelector::Number(42)
        );
    }

    #[test]
    fn test_selector_by_hash() {
        let hash = "0x88e96d4537bea4d9c05d12549907b32561d3bf31f45aae734cdc119f13406cb6";
        assert_eq!(
            BlockSelector::from_args(&args(0, Some(hash))).unwrap(),
            BlockSelector::Hash(hash.parse().unwrap())
        );
    }

    #[test]
    fn test_selector_requires_one() {
        let err = BlockSelector::from_args(&args(0, None)).unwrap_err();
        assert!(err.to_string().starts_with("Either block number"));

        let err = BlockSelector::from_args(&args(1, Some("0x01"))).unwrap_err();
        assert!(err.to_string().starts_with("Ambiguous"));
    }
}
