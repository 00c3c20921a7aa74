//! Ethereum address checksum (EIP-55)

use alloy::primitives::keccak256;
use anyhow::Result;
use clap::Args;

use super::required;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Address to check
    #[arg(short, long)]
    pub address: Option<String>,
}

pub fn run(args: ValidateArgs) -> Result<()> {
    let address = required(&args.address, "No address provided")?;
    println!("{}", validate(address));
    Ok(())
}

pub fn validate(input: &str) -> String {
    match checksum(input) {
        Some(address) => format!("Valid address: {}", address),
        None => "Address is INVALID".to_string(),
    }
}

/// Checksummed form of a 40-digit hex address, with or without `0x`
pub fn checksum(input: &str) -> Option<String> {
    let trimmed = input.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    if digits.len() != 40 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    Some(to_checksum_address(&digits.to_ascii_lowercase()))
}

fn to_checksum_address(addr: &str) -> String {
    let hash = hex::encode(keccak256(addr.as_bytes()));

    let mut result = String::with_capacity(42);
    result.push_str("0x");
    for (c, h) in addr.chars().zip(hash.chars()) {
        if h.to_digit(16).unwrap_or(0) >= 8 {
            result.push(c.to_ascii_uppercase());
        } else {
            result.push(c);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    #[test]
    fn test_checksum() {
        assert_eq!(
            checksum("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").as_deref(),
            Some("0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359")
        );
    }

    #[test]
    fn test_checksum_agrees_with_alloy() {
        let raw = "d8da6bf26964af9d7eed9e03e53415d37aa96045";
        let expected = raw.parse::<Address>().unwrap().to_checksum(None);
        assert_eq!(checksum(raw), Some(expected));
    }

    #[test]
    fn test_validate_output() {
        assert_eq!(
            validate("0XFB6916095CA1DF60BB79CE92CE3EA74C37C5D359"),
            "Valid address: 0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
        );
        assert_eq!(validate("0x1234"), "Address is INVALID");
        assert_eq!(
            validate("0xzz6916095ca1df60bb79ce92ce3ea74c37c5d359"),
            "Address is INVALID"
        );
    }
}
