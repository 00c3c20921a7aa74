//! Text presentation for node data and decoded calls/events
//!
//! Every formatter returns the full text block; commands print it to stdout.

pub mod units;

use alloy::primitives::Address;

use crate::domain::abi::{AbiMethod, DecodedCall, DecodedEvent, DecodedParameter, Match};
use crate::infrastructure::ethereum::{RawBlock, RawLog, RawReceipt, RawTransaction};

/// Lines collected for one output block
#[derive(Debug, Default)]
struct Block {
    lines: Vec<String>,
}

impl Block {
    fn line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    fn field(&mut self, label: &str, value: impl std::fmt::Display) -> &mut Self {
        self.line(format!("{}: {}", label, value))
    }

    fn finish(self) -> String {
        let mut out = self.lines.join("\n");
        out.push('\n');
        out
    }
}

fn push_arguments(out: &mut Block, arguments: &[DecodedParameter]) {
    for arg in arguments {
        out.line(format!("\t{} = {}", arg.name, arg.value));
    }
}

/// Method header, selector and decoded arguments (or the decode error)
pub fn format_call(found: &Match<'_, DecodedCall>) -> String {
    let method = found.method;
    let mut out = Block::default();
    out.field("Method", method.name())
        .field("Signature", &method.signature.text)
        .field("Selector", method.signature.selector_hex())
        .field("Inputs", method.field.input_names());

    match &found.decoded {
        Ok(call) => push_arguments(&mut out, &call.arguments),
        Err(err) => {
            out.line(format!("\tdecode error: {}", err));
        }
    }

    out.line("");
    out.finish()
}

/// Event header, emitting address, topic and decoded arguments
pub fn format_event(found: &Match<'_, DecodedEvent>, address: Address) -> String {
    let method = found.method;
    let mut out = Block::default();
    out.field("Event", method.name())
        .field("Address", address)
        .field("Signature", &method.signature.text)
        .field("Topic", method.signature.hash_hex())
        .field("Inputs", method.field.input_names());

    match &found.decoded {
        Ok(event) => push_arguments(&mut out, &event.arguments),
        Err(err) => {
            out.line(format!("\tdecode error: {}", err));
        }
    }

    out.line("");
    out.finish()
}

/// One `hash signature inputNames` line of the signature listing
pub fn format_signature_line(method: &AbiMethod) -> String {
    format!(
        "{} {} {}",
        method.signature.hash_hex(),
        method.signature.text,
        method.field.input_names()
    )
}

pub fn format_transaction(tx: &RawTransaction) -> String {
    let mut out = Block::default();
    out.field("Hash", &tx.hash);
    if let Some(to) = &tx.to {
        out.field("To", to);
    }
    out.field("From", &tx.from)
        .field("TxType", format!("0x{:x}", tx.tx_type.unwrap_or(0)))
        .field("Value", tx.value)
        .field("Gas", tx.gas)
        .field(
            "Gas Price",
            tx.gas_price.map(|p| p.to_string()).unwrap_or_else(|| "-".to_string()),
        )
        .field("Nonce", tx.nonce);

    let data = tx.input.as_ref();
    if data.len() >= 4 {
        out.field("Data", hex::encode(&data[..4]));
        for word in data[4..].chunks_exact(32) {
            out.line(format!("      {}", hex::encode(word)));
        }
    } else {
        out.field("Data", hex::encode(data));
    }

    out.field("V", tx.v.as_deref().unwrap_or("-"))
        .field("R", tx.r.as_deref().unwrap_or("-"))
        .field("S", tx.s.as_deref().unwrap_or("-"))
        .line("")
        .field("Pending", tx.is_pending())
        .line("");
    out.finish()
}

pub fn format_receipt(receipt: &RawReceipt) -> String {
    let mut out = Block::default();
    out.field(
        "Status",
        receipt.status.map(|s| s.to_string()).unwrap_or_else(|| "-".to_string()),
    )
    .field("Cumulative Gas Used", receipt.cumulative_gas_used)
    .field("Gas Used", receipt.gas_used);
    if let Some(address) = &receipt.contract_address {
        out.field("Contract Address", address);
    }
    out.field("Bloom", &receipt.logs_bloom).line("Logs:");

    let mut text = out.finish();
    for log in &receipt.logs {
        text.push_str(&format_log(log));
    }
    text
}

pub fn format_log(log: &RawLog) -> String {
    let mut out = Block::default();
    out.line(format!("\tAddress: {}", log.address));
    if let Some(hash) = log.block_hash {
        out.line(format!("\tBlock Hash: {}", hash));
    }
    if let Some(number) = log.block_number {
        out.line(format!("\tBlock Number: {}", number));
    }
    out.line(format!("\tRemoved: {}", log.removed))
        .line(format!("\tData: {}", hex::encode(&log.data)))
        .line("\tTopics:");
    for topic in &log.topics {
        out.line(format!("\t\t{}", hex::encode(topic)));
    }
    out.line("");
    out.finish()
}

pub fn format_block(block: &RawBlock) -> String {
    let timestamp = chrono::DateTime::from_timestamp(block.timestamp as i64, 0)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| block.timestamp.to_string());

    let mut out = Block::default();
    out.field("Number", block.number)
        .field("Hash", &block.hash)
        .field("Parent Hash", &block.parent_hash)
        .field("Timestamp", format!("{} ({})", block.timestamp, timestamp))
        .field("Miner", &block.miner)
        .field("Gas Used", block.gas_used)
        .field("Gas Limit", block.gas_limit);
    if let Some(base_fee) = block.base_fee_per_gas {
        out.field("Base Fee", base_fee);
    }
    out.field("Transactions", block.transactions.len());
    for tx in &block.transactions {
        out.line(format!("\t{}", tx.hash));
    }
    out.finish()
}

/// Header of the address scan table
pub fn scan_header() -> String {
    format!("Block   | Hash\n{}\n", "-".repeat(76))
}

pub fn scan_row(block: u64, hash: &str) -> String {
    format!("{:7} | {}\n", block, hash)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{AbiField, Argument, DecodeError, SignatureTable};
    use crate::infrastructure::abi::SlotDecoder;
    use alloy::primitives::{Bytes, U256};

    fn table() -> SignatureTable {
        SignatureTable::build(&[
            AbiField::function(
                "transfer",
                vec![Argument::new("to", "address"), Argument::new("amount", "uint256")],
            ),
            AbiField::event(
                "Transfer",
                vec![
                    Argument::indexed("from", "address"),
                    Argument::indexed("to", "address"),
                    Argument::new("value", "uint256"),
                ],
            ),
        ])
    }

    fn calldata() -> Vec<u8> {
        hex::decode(
            "a9059cbb000000000000000000000000123456789012345678901234567890123456789000000000000000000000000000000000000000000000000000000000000003e8",
        )
        .unwrap()
    }

    #[test]
    fn test_format_call() {
        let table = table();
        let matches = SlotDecoder.decode_calls(&table, &calldata());
        let text = format_call(&matches[0]);

        assert_eq!(
            text,
            "Method: transfer\n\
             Signature: transfer(address,uint256)\n\
             Selector: 0xa9059cbb\n\
             Inputs: to, amount\n\
             \tto = 0x1234567890123456789012345678901234567890\n\
             \tamount = 1000\n\
             \n"
        );
    }

    #[test]
    fn test_format_call_decode_error() {
        let table = table();
        let mut input = calldata();
        input.truncate(10);
        let matches = SlotDecoder.decode_calls(&table, &input);
        assert!(matches!(
            matches[0].decoded,
            Err(DecodeError::MissingSlot { index: 0, .. })
        ));

        let text = format_call(&matches[0]);
        assert!(text.starts_with("Method: transfer\n"));
        assert!(text.contains("\tdecode error: payload too short: slot 0 is missing"));
    }

    #[test]
    fn test_format_event() {
        let table = table();
        let topics = vec![
            table.sorted().into_iter().find(|m| m.field.is_event()).unwrap().signature.hash,
            alloy::primitives::B256::left_padding_from(&[0x11; 20]),
            alloy::primitives::B256::left_padding_from(&[0x22; 20]),
        ];
        let data = U256::from(5u64).to_be_bytes::<32>();
        let emitter = Address::repeat_byte(0xaa);

        let found = SlotDecoder.decode_log(&table, emitter, &topics, &data).unwrap();
        let text = format_event(&found, emitter);

        assert!(text.starts_with("Event: Transfer\nAddress: 0x"));
        assert!(text.contains(
            "Topic: 0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef\n"
        ));
        assert!(text.contains("\tfrom = 0x1111111111111111111111111111111111111111\n"));
        assert!(text.contains("\tvalue = 5\n"));
    }

    #[test]
    fn test_format_signature_line() {
        let table = table();
        let lines: Vec<String> = table.sorted().into_iter().map(format_signature_line).collect();
        assert_eq!(
            lines[0],
            "0xa9059cbb2ab09eb219583f4a59a5d0623ade346d962bcd4e46b11da047c9049b transfer(address,uint256) to, amount"
        );
    }

    #[test]
    fn test_format_transaction_data_words() {
        let tx = RawTransaction {
            hash: "0xabc".to_string(),
            from: "0xfrom".to_string(),
            to: None,
            value: U256::ZERO,
            input: Bytes::from(calldata()),
            gas: 21000,
            gas_price: None,
            nonce: 1,
            tx_type: Some(2),
            block_number: None,
            v: None,
            r: None,
            s: None,
        };

        let text = format_transaction(&tx);
        assert!(!text.contains("To:"));
        assert!(text.contains("TxType: 0x2\n"));
        assert!(text.contains("Data: a9059cbb\n"));
        assert!(text.contains(
            "      00000000000000000000000000000000000000000000000000000000000003e8\n"
        ));
        assert!(text.contains("Pending: true\n"));
    }

    #[test]
    fn test_scan_row() {
        assert_eq!(scan_row(42, "0xabc"), "     42 | 0xabc\n");
        assert!(scan_header().starts_with("Block   | Hash\n---"));
    }
}
