//! Signature table - named ABI fields indexed by signature hash

use std::collections::HashMap;

use alloy_primitives::B256;
use tracing::warn;

use super::{AbiField, Signature};

/// A named ABI field with its derived signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AbiMethod {
    pub field: AbiField,
    pub signature: Signature,
}

impl AbiMethod {
    pub fn name(&self) -> &str {
        &self.field.name
    }
}

/// Two fields that produced the same signature hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    pub hash: B256,
    /// Signature of the entry that was overwritten
    pub replaced: String,
    /// Signature of the entry that is kept (last inserted)
    pub kept: String,
}

/// Immutable lookup of signature hash → method, built once from a parsed ABI
#[derive(Debug, Default, Clone)]
pub struct SignatureTable {
    methods: HashMap<B256, AbiMethod>,
    collisions: Vec<Collision>,
}

impl SignatureTable {
    /// Build the table from every named field
    ///
    /// Note: last field for a given hash wins; each overwrite is recorded and logged.
    pub fn build(fields: &[AbiField]) -> Self {
        let mut methods = HashMap::new();
        let mut collisions = Vec::new();

        for field in fields {
            let Some(signature) = Signature::of(field) else {
                continue;
            };

            let hash = signature.hash;
            let kept = signature.text.clone();
            let method = AbiMethod {
                field: field.clone(),
                signature,
            };

            if let Some(previous) = methods.insert(hash, method) {
                warn!(
                    hash = %hash,
                    replaced = %previous.signature.text,
                    kept = %kept,
                    "signature collision, keeping last entry"
                );
                collisions.push(Collision {
                    hash,
                    replaced: previous.signature.text,
                    kept,
                });
            }
        }

        Self {
            methods,
            collisions,
        }
    }

    /// Look up by full hash
    pub fn get(&self, hash: &B256) -> Option<&AbiMethod> {
        self.methods.get(hash)
    }

    /// Look up by full hash hex string; hex digits match case-insensitively
    pub fn lookup_hex(&self, hash_hex: &str) -> Option<&AbiMethod> {
        let hash: B256 = hash_hex.trim().parse().ok()?;
        self.get(&hash)
    }

    /// Every entry whose selector equals the first 4 bytes of the call input
    ///
    /// Matching is by prefix only, so selector-like bytes inside the
    /// parameter data never produce a match.
    pub fn match_call(&self, input: &[u8]) -> Vec<&AbiMethod> {
        let Some(prefix) = input.get(..4) else {
            return Vec::new();
        };

        let mut matches: Vec<&AbiMethod> = self
            .methods
            .values()
            .filter(|method| method.signature.selector() == prefix)
            .collect();
        matches.sort_by(|a, b| a.signature.hash.cmp(&b.signature.hash));
        matches
    }

    /// Match a log by its topic-0
    ///
    /// Logs without topics match nothing, and anonymous events are never
    /// returned since they emit no topic-0.
    pub fn match_log(&self, topics: &[B256]) -> Option<&AbiMethod> {
        let topic0 = topics.first()?;
        self.get(topic0)
            .filter(|method| !method.field.is_anonymous_event())
    }

    /// All entries ordered by hash
    pub fn sorted(&self) -> Vec<&AbiMethod> {
        let mut methods: Vec<&AbiMethod> = self.methods.values().collect();
        methods.sort_by(|a, b| a.signature.hash.cmp(&b.signature.hash));
        methods
    }

    pub fn collisions(&self) -> &[Collision] {
        &self.collisions
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::abi::{Argument, FieldKind};

    fn erc20() -> Vec<AbiField> {
        vec![
            AbiField {
                kind: FieldKind::Constructor,
                inputs: vec![Argument::new("supply", "uint256")],
                ..AbiField::default()
            },
            AbiField::function(
                "transfer",
                vec![Argument::new("to", "address"), Argument::new("amount", "uint256")],
            ),
            AbiField::function("balanceOf", vec![Argument::new("owner", "address")]),
            AbiField::event(
                "Transfer",
                vec![
                    Argument::indexed("from", "address"),
                    Argument::indexed("to", "address"),
                    Argument::new("value", "uint256"),
                ],
            ),
        ]
    }

    #[test]
    fn test_build_skips_unnamed() {
        let table = SignatureTable::build(&erc20());
        assert_eq!(table.len(), 3);
        assert!(table.collisions().is_empty());
    }

    #[test]
    fn test_match_call_by_prefix() {
        let table = SignatureTable::build(&erc20());
        let input = hex::decode(
            "a9059cbb000000000000000000000000123456789012345678901234567890123456789000000000000000000000000000000000000000000000000000000000000003e8",
        )
        .unwrap();

        let matches = table.match_call(&input);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name(), "transfer");
    }

    #[test]
    fn test_selector_inside_params_is_not_a_match() {
        let table = SignatureTable::build(&erc20());
        // Unknown selector, but the transfer selector appears in the parameter data
        let input = hex::decode(
            "deadbeef00000000000000000000000000000000000000000000000000000000a9059cbb",
        )
        .unwrap();

        assert!(table.match_call(&input).is_empty());
    }

    #[test]
    fn test_short_input_matches_nothing() {
        let table = SignatureTable::build(&erc20());
        assert!(table.match_call(&[]).is_empty());
        assert!(table.match_call(&[0xa9, 0x05, 0x9c]).is_empty());
    }

    #[test]
    fn test_match_log_topic0() {
        let table = SignatureTable::build(&erc20());
        let topic0: B256 = "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
            .parse()
            .unwrap();

        let method = table.match_log(&[topic0, B256::ZERO]).unwrap();
        assert_eq!(method.name(), "Transfer");
        assert!(table.match_log(&[]).is_none());
        assert!(table.match_log(&[B256::ZERO]).is_none());
    }

    #[test]
    fn test_lookup_hex_case_insensitive() {
        let table = SignatureTable::build(&erc20());
        let upper = "0xDDF252AD1BE2C89B69C2B068FC378DAA952BA7F163C4A11628F55A4DF523B3EF";
        assert_eq!(table.lookup_hex(upper).unwrap().name(), "Transfer");
        assert!(table.lookup_hex("0xnothex").is_none());
    }

    #[test]
    fn test_anonymous_event_not_matched() {
        let mut ping = AbiField::event("Ping", vec![Argument::indexed("who", "address")]);
        ping.anonymous = true;
        let topic0 = Signature::of(&ping).unwrap().hash;

        let table = SignatureTable::build(&[ping]);
        assert_eq!(table.len(), 1);
        assert!(table.match_log(&[topic0]).is_none());
    }

    #[test]
    fn test_last_write_wins_on_collision() {
        let first = AbiField::function("ping", vec![Argument::new("a", "uint256")]);
        let mut second = AbiField::event("ping", vec![Argument::new("b", "uint256")]);
        second.constant = true;

        let table = SignatureTable::build(&[first, second]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.collisions().len(), 1);
        assert_eq!(table.collisions()[0].kept, "ping(uint256)");

        let kept = table.sorted()[0];
        assert_eq!(kept.field.kind, FieldKind::Event);
        assert_eq!(kept.field.inputs[0].name, "b");
    }

    #[test]
    fn test_sorted_by_hash() {
        let table = SignatureTable::build(&erc20());
        let hashes: Vec<String> = table
            .sorted()
            .iter()
            .map(|m| m.signature.hash_hex())
            .collect();

        let mut expected = hashes.clone();
        expected.sort();
        assert_eq!(hashes, expected);
        assert_eq!(hashes[0], "0x70a08231b98ef4ca268c9cc3f6b4590e4bfec28280db06bb5d45e689f2a360be");
    }
}
