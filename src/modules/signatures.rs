use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Args;

use super::load_table;
use crate::domain::abi::SignatureTable;
use crate::ui::format_signature_line;

#[derive(Debug, Args)]
pub struct SignaturesArgs {
    /// ABI file
    #[arg(long)]
    pub abi: Option<PathBuf>,
}

pub fn run(args: SignaturesArgs) -> Result<()> {
    let Some(path) = args.abi else {
        bail!("ABI file path is required");
    };
    let table = load_table(&path)?;
    print!("{}", listing(&table));
    Ok(())
}

/// One line per entry, sorted by hash
pub fn listing(table: &SignatureTable) -> String {
    table
        .sorted()
        .into_iter()
        .map(|method| format_signature_line(method) + "\n")
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{AbiField, Argument};

    #[test]
    fn test_listing_sorted_by_hash() {
        let table = SignatureTable::build(&[
            AbiField::function(
                "transfer",
                vec![Argument::new("to", "address"), Argument::new("amount", "uint256")],
            ),
            AbiField::function("totalSupply", vec![]),
            AbiField::function("balanceOf", vec![Argument::new("owner", "address")]),
        ]);

        let text = listing(&table);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("0x18160ddd"));
        assert!(lines[0].ends_with("totalSupply() "));
        assert!(lines[1].starts_with("0x70a08231"));
        assert!(lines[1].ends_with("balanceOf(address) owner"));
        assert!(lines[2].starts_with("0xa9059cbb"));
    }

    #[test]
    fn test_missing_abi_flag() {
        let err = run(SignaturesArgs { abi: None }).unwrap_err();
        assert_eq!(err.to_string(), "ABI file path is required");
    }
}
