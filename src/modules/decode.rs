//! Offline decoding of raw signed transactions (legacy RLP or EIP-2718)

use alloy::consensus::transaction::SignerRecoverable;
use alloy::consensus::{Transaction, TxEnvelope};
use alloy::eips::eip2718::Decodable2718;
use alloy::eips::Typed2718;
use alloy::primitives::U256;
use anyhow::{Context as _, Result};
use clap::Args;
use tracing::warn;

use super::required;
use crate::infrastructure::ethereum::types::parse_hex_bytes;
use crate::infrastructure::ethereum::RawTransaction;
use crate::ui::format_transaction;

#[derive(Debug, Args)]
pub struct DecodeArgs {
    /// Hex-encoded signed transaction
    #[arg(long)]
    pub hex: Option<String>,
}

pub fn run(args: DecodeArgs) -> Result<()> {
    let raw = required(&args.hex, "No hex string provided")?;
    let tx = decode_raw(raw)?;
    print!("{}", format_transaction(&tx));
    Ok(())
}

/// Decode a signed transaction and recover its sender
pub fn decode_raw(input: &str) -> Result<RawTransaction> {
    let bytes = parse_hex_bytes(input)?;
    let envelope = TxEnvelope::decode_2718(&mut bytes.as_slice())
        .context("Failed to decode raw transaction")?;

    let from = match envelope.recover_signer() {
        Ok(address) => address.to_checksum(None),
        Err(err) => {
            warn!(%err, "could not recover sender");
            "-".to_string()
        }
    };

    let signature = envelope.signature();
    let parity = u64::from(signature.v());
    let v = if envelope.is_legacy() {
        match envelope.chain_id() {
            Some(chain_id) => 35 + 2 * chain_id + parity,
            None => 27 + parity,
        }
    } else {
        parity
    };

    let gas_price = envelope
        .gas_price()
        .unwrap_or_else(|| envelope.max_fee_per_gas());

    Ok(RawTransaction {
        hash: envelope.tx_hash().to_string(),
        from,
        to: envelope.to().map(|to| to.to_checksum(None)),
        value: envelope.value(),
        input: envelope.input().clone(),
        gas: envelope.gas_limit(),
        gas_price: Some(U256::from(gas_price)),
        nonce: envelope.nonce(),
        tx_type: Some(envelope.ty()),
        block_number: None,
        v: Some(format!("0x{:x}", v)),
        r: Some(format!("{:#x}", signature.r())),
        s: Some(format!("{:#x}", signature.s())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // EIP-155 example transaction, signed with key 0x4646..46 on chain 1
    const EIP155_TX: &str = "f86c098504a817c800825208943535353535353535353535353535353535353535880de0b6b3a76400008025a028ef61340bd939bc2195fe537567866003e1a15d3c71ff63e1590620aa636276a067cbe9d8997f761aecb703304b3800ccf555c9f3dc64214b297fb1966a3b6d83";

    #[test]
    fn test_decode_legacy_transaction() {
        let tx = decode_raw(EIP155_TX).unwrap();

        assert_eq!(
            tx.hash,
            "0x33469b22e9f636356c4160a87eb19df52b7412e8eac32a4a55ffe88ea8350788"
        );
        assert_eq!(tx.from, "0x9d8A62f656a8d1615C1294fd71e9CFb3E4855A4F");
        assert_eq!(
            tx.to.as_deref(),
            Some("0x3535353535353535353535353535353535353535")
        );
        assert_eq!(tx.nonce, 9);
        assert_eq!(tx.gas, 21000);
        assert_eq!(tx.gas_price, Some(U256::from(20_000_000_000u64)));
        assert_eq!(tx.value, U256::from(1_000_000_000_000_000_000u128));
        assert_eq!(tx.tx_type, Some(0));
        assert_eq!(tx.v.as_deref(), Some("0x25"));
        assert!(tx.input.is_empty());
    }

    #[test]
    fn test_decode_accepts_prefix() {
        let prefixed = format!("0x{}", EIP155_TX);
        assert_eq!(decode_raw(&prefixed).unwrap().nonce, 9);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_raw("0xzz").is_err());
        assert!(decode_raw("0x0102").is_err());
    }
}
