//! Chain-agnostic node data parsed from raw JSON-RPC responses
//!
//! Raw JSON is used instead of typed alloy responses so that chains with
//! non-standard transaction types still parse.

use alloy::primitives::{Address, Bytes, B256, U256};
use anyhow::{Context, Result};
use serde_json::Value;

/// Block header plus its transactions
#[derive(Debug, Clone)]
pub struct RawBlock {
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    pub timestamp: u64,
    pub gas_used: u64,
    pub gas_limit: u64,
    pub base_fee_per_gas: Option<u64>,
    pub miner: String,
    pub transactions: Vec<RawTransaction>,
}

#[derive(Debug, Clone)]
pub struct RawTransaction {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value: U256,
    pub input: Bytes,
    pub gas: u64,
    pub gas_price: Option<U256>,
    pub nonce: u64,
    pub tx_type: Option<u8>,
    /// None while the transaction is pending
    pub block_number: Option<u64>,
    pub v: Option<String>,
    pub r: Option<String>,
    pub s: Option<String>,
}

impl RawTransaction {
    pub fn is_pending(&self) -> bool {
        self.block_number.is_none()
    }
}

#[derive(Debug, Clone)]
pub struct RawReceipt {
    pub status: Option<u64>,
    pub cumulative_gas_used: u64,
    pub gas_used: u64,
    pub contract_address: Option<String>,
    pub logs_bloom: String,
    pub logs: Vec<RawLog>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    pub address: Address,
    pub topics: Vec<B256>,
    pub data: Bytes,
    pub block_hash: Option<B256>,
    pub block_number: Option<u64>,
    pub transaction_hash: Option<B256>,
    pub removed: bool,
}

impl From<alloy::rpc::types::Log> for RawLog {
    fn from(log: alloy::rpc::types::Log) -> Self {
        Self {
            address: log.address(),
            topics: log.topics().to_vec(),
            data: log.data().data.clone(),
            block_hash: log.block_hash,
            block_number: log.block_number,
            transaction_hash: log.transaction_hash,
            removed: log.removed,
        }
    }
}

/// Parse raw JSON block response
pub fn parse_raw_block(json: &Value) -> Result<RawBlock> {
    let number = parse_hex_u64(str_field(json, "number").unwrap_or("0x0"))?;
    let hash = str_field(json, "hash").unwrap_or("0x0").to_string();
    let parent_hash = str_field(json, "parentHash").unwrap_or("0x0").to_string();
    let timestamp = parse_hex_u64(str_field(json, "timestamp").unwrap_or("0x0"))?;
    let gas_used = parse_hex_u64(str_field(json, "gasUsed").unwrap_or("0x0"))?;
    let gas_limit = parse_hex_u64(str_field(json, "gasLimit").unwrap_or("0x0"))?;
    let base_fee_per_gas = str_field(json, "baseFeePerGas").map(|s| parse_hex_u64(s).unwrap_or(0));
    let miner = str_field(json, "miner")
        .unwrap_or("0x0000000000000000000000000000000000000000")
        .to_string();

    let mut transactions = Vec::new();
    if let Some(txs) = json.get("transactions").and_then(|v| v.as_array()) {
        for tx_json in txs {
            if let Some(tx) = parse_raw_transaction(tx_json) {
                transactions.push(tx);
            }
        }
    }

    Ok(RawBlock {
        number,
        hash,
        parent_hash,
        timestamp,
        gas_used,
        gas_limit,
        base_fee_per_gas,
        miner,
        transactions,
    })
}

/// Parse a single transaction from JSON
///
/// Returns None for hash-only entries (blocks fetched without full transactions).
pub fn parse_raw_transaction(json: &Value) -> Option<RawTransaction> {
    let hash = json.get("hash")?.as_str()?.to_string();
    let from = json.get("from")?.as_str()?.to_string();
    let to = str_field(json, "to").map(|s| s.to_string());

    let value = parse_hex_u256(str_field(json, "value").unwrap_or("0x0")).unwrap_or(U256::ZERO);
    let gas_price = str_field(json, "gasPrice").and_then(|s| parse_hex_u256(s).ok());

    // Some clients still call it "data"
    let input_str = str_field(json, "input")
        .or_else(|| str_field(json, "data"))
        .unwrap_or("0x");
    let input = Bytes::from(parse_hex_bytes(input_str).unwrap_or_default());

    let gas = parse_hex_u64(str_field(json, "gas").unwrap_or("0x0")).unwrap_or(0);
    let nonce = parse_hex_u64(str_field(json, "nonce").unwrap_or("0x0")).unwrap_or(0);

    let tx_type = str_field(json, "type")
        .and_then(|s| parse_hex_u64(s).ok())
        .map(|n| n as u8);
    let block_number = str_field(json, "blockNumber").and_then(|s| parse_hex_u64(s).ok());

    Some(RawTransaction {
        hash,
        from,
        to,
        value,
        input,
        gas,
        gas_price,
        nonce,
        tx_type,
        block_number,
        v: str_field(json, "v").map(|s| s.to_string()),
        r: str_field(json, "r").map(|s| s.to_string()),
        s: str_field(json, "s").map(|s| s.to_string()),
    })
}

/// Parse raw JSON receipt response
pub fn parse_raw_receipt(json: &Value) -> Result<RawReceipt> {
    let status = str_field(json, "status").and_then(|s| parse_hex_u64(s).ok());
    let cumulative_gas_used = parse_hex_u64(str_field(json, "cumulativeGasUsed").unwrap_or("0x0"))?;
    let gas_used = parse_hex_u64(str_field(json, "gasUsed").unwrap_or("0x0"))?;
    let contract_address = str_field(json, "contractAddress").map(|s| s.to_string());
    let logs_bloom = str_field(json, "logsBloom").unwrap_or("0x").to_string();

    let logs = match json.get("logs").and_then(|v| v.as_array()) {
        Some(entries) => entries
            .iter()
            .map(parse_raw_log)
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    Ok(RawReceipt {
        status,
        cumulative_gas_used,
        gas_used,
        contract_address,
        logs_bloom,
        logs,
    })
}

/// Parse a single log entry from JSON
pub fn parse_raw_log(json: &Value) -> Result<RawLog> {
    let address = str_field(json, "address")
        .context("log without address")?
        .parse::<Address>()
        .context("Invalid log address")?;

    let topics = match json.get("topics").and_then(|v| v.as_array()) {
        Some(entries) => entries
            .iter()
            .map(|topic| {
                topic
                    .as_str()
                    .context("topic is not a string")?
                    .parse::<B256>()
                    .context("Invalid topic")
            })
            .collect::<Result<Vec<_>>>()?,
        None => Vec::new(),
    };

    let data = Bytes::from(parse_hex_bytes(str_field(json, "data").unwrap_or("0x"))?);

    Ok(RawLog {
        address,
        topics,
        data,
        block_hash: str_field(json, "blockHash").and_then(|s| s.parse().ok()),
        block_number: str_field(json, "blockNumber").and_then(|s| parse_hex_u64(s).ok()),
        transaction_hash: str_field(json, "transactionHash").and_then(|s| s.parse().ok()),
        removed: json.get("removed").and_then(|v| v.as_bool()).unwrap_or(false),
    })
}

fn str_field<'a>(json: &'a Value, key: &str) -> Option<&'a str> {
    json.get(key).and_then(|v| v.as_str())
}

/// Parse hex string to u64
pub fn parse_hex_u64(s: &str) -> Result<u64> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() {
        return Ok(0);
    }
    u64::from_str_radix(s, 16).context("Failed to parse hex u64")
}

/// Parse hex string to U256
pub fn parse_hex_u256(s: &str) -> Result<U256> {
    let s = s.strip_prefix("0x").unwrap_or(s);
    if s.is_empty() || s == "0" {
        return Ok(U256::ZERO);
    }
    U256::from_str_radix(s, 16).context("Failed to parse hex u256")
}

/// Decode a hex string with optional 0x prefix
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>> {
    let s = s.trim();
    let s = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    hex::decode(s).context("Failed to decode hex")
}
