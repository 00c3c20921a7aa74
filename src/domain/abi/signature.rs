//! Canonical signature text and Keccak-256 hashes for ABI fields

use alloy_primitives::{keccak256, B256};

use super::AbiField;

/// Signature text of a named field together with its hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    /// Canonical text, e.g. "transfer(address,uint256)"
    pub text: String,
    /// keccak256(text)
    pub hash: B256,
}

impl Signature {
    /// Build the signature for a field
    ///
    /// Returns `None` for fields without a name (constructor, fallback, receive).
    /// Input types are used verbatim: `uint` is not expanded to `uint256`.
    pub fn of(field: &AbiField) -> Option<Self> {
        if !field.has_name() {
            return None;
        }
        Some(Self::from_parts(&field.name, field.input_types()))
    }

    pub fn from_parts<'a>(name: &str, types: impl IntoIterator<Item = &'a str>) -> Self {
        let text = format!("{}({})", name, types.into_iter().collect::<Vec<_>>().join(","));
        let hash = keccak256(text.as_bytes());
        Self { text, hash }
    }

    /// Full hash as "0x" + 64 lowercase hex chars (event topic-0)
    pub fn hash_hex(&self) -> String {
        format!("0x{}", hex::encode(self.hash))
    }

    /// First 4 bytes of the hash (function selector)
    pub fn selector(&self) -> [u8; 4] {
        [self.hash[0], self.hash[1], self.hash[2], self.hash[3]]
    }

    /// Selector as "0x" + 8 lowercase hex chars
    pub fn selector_hex(&self) -> String {
        format!("0x{}", hex::encode(self.selector()))
    }
}
