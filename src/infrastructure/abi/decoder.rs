//! Fixed-width slot decoder and signature matching

use alloy_primitives::{Address, B256, U256};
use tracing::{debug, warn};

use crate::domain::abi::{
    AbiDecoder, DecodeError, DecodedCall, DecodedEvent, DecodedValue, Match, SignatureTable,
    WORD_SIZE,
};

/// Decoder for static, one-slot ABI types
///
/// Numeric types become unsigned integers, `address` takes the low 20 bytes
/// and everything else (including dynamic types, whose slot only holds an
/// offset) is shown as the raw slot.
#[derive(Debug, Default, Clone, Copy)]
pub struct SlotDecoder;

impl SlotDecoder {
    pub fn new() -> Self {
        Self
    }

    /// Match call input against the table and decode every match
    ///
    /// An unknown selector yields no matches. A decode failure is kept on its
    /// match so the remaining matches are still reported.
    pub fn decode_calls<'a>(
        &self,
        table: &'a SignatureTable,
        input: &[u8],
    ) -> Vec<Match<'a, DecodedCall>> {
        table
            .match_call(input)
            .into_iter()
            .map(|method| {
                let decoded = self.decode_call(method, input);
                if let Err(err) = &decoded {
                    warn!(method = %method.signature.text, %err, "failed to decode call");
                } else {
                    debug!(method = %method.signature.text, "decoded call");
                }
                Match { method, decoded }
            })
            .collect()
    }

    /// Match a log by topic-0 and decode it
    pub fn decode_log<'a>(
        &self,
        table: &'a SignatureTable,
        address: Address,
        topics: &[B256],
        data: &[u8],
    ) -> Option<Match<'a, DecodedEvent>> {
        let method = table.match_log(topics)?;
        let decoded = self.decode_event(method, address, topics, data);
        if let Err(err) = &decoded {
            warn!(event = %method.signature.text, %err, "failed to decode log");
        }
        Some(Match { method, decoded })
    }
}

impl AbiDecoder for SlotDecoder {
    fn decode_word(
        &self,
        ty: &str,
        word: &[u8; WORD_SIZE],
        index: usize,
    ) -> Result<DecodedValue, DecodeError> {
        if is_numeric(ty) {
            let value =
                U256::try_from_be_slice(word).ok_or(DecodeError::Overflow { index })?;
            return Ok(DecodedValue::Uint(value));
        }

        if ty == "address" {
            // Padding in bytes 0..12 is ignored
            return Ok(DecodedValue::Address(Address::from_slice(&word[12..])));
        }

        Ok(DecodedValue::Raw(B256::from(*word)))
    }
}

/// `int`, `uint` and their sized variants (`uint8` … `uint256`)
fn is_numeric(ty: &str) -> bool {
    let bits = ty
        .strip_prefix("uint")
        .or_else(|| ty.strip_prefix("int"));

    match bits {
        Some(bits) => bits.chars().all(|c| c.is_ascii_digit()),
        None => false,
    }
}
