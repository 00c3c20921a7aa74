//! Parameter decoder trait and decoded value types

use std::fmt;

use alloy_primitives::{Address, B256, U256};

use super::{AbiMethod, Argument, DecodeError};

/// Size of one ABI slot
pub const WORD_SIZE: usize = 32;

/// Display value of one decoded slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodedValue {
    /// Numeric type read as a big-endian unsigned integer
    Uint(U256),
    /// Low 20 bytes of the slot
    Address(Address),
    /// Any other type: the full slot, not decoded
    Raw(B256),
}

impl fmt::Display for DecodedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodedValue::Uint(value) => write!(f, "{}", value),
            DecodedValue::Address(addr) => write!(f, "0x{}", hex::encode(addr)),
            DecodedValue::Raw(word) => write!(f, "0x{}", hex::encode(word)),
        }
    }
}

/// A decoded argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedParameter {
    /// Parameter name (or "arg{n}" if unnamed)
    pub name: String,
    /// Solidity type as declared in the ABI
    pub raw_type: String,
    pub value: DecodedValue,
}

/// Result of decoding a function call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCall {
    pub method_name: String,
    /// Full signature (e.g., "transfer(address,uint256)")
    pub signature: String,
    /// "0x" + 4-byte selector
    pub selector: String,
    pub arguments: Vec<DecodedParameter>,
}

/// Result of decoding a log against an event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedEvent {
    pub event_name: String,
    pub signature: String,
    /// "0x" + 32-byte topic-0
    pub topic: String,
    pub address: Address,
    pub arguments: Vec<DecodedParameter>,
}

/// Outcome for one matched method; a failed decode does not hide the match
#[derive(Debug, Clone)]
pub struct Match<'a, T> {
    pub method: &'a AbiMethod,
    pub decoded: Result<T, DecodeError>,
}

/// Trait for slot decoding implementations
///
/// Only `decode_word` is required; call and event decoding are built on it.
pub trait AbiDecoder {
    /// Decode one 32-byte slot according to its declared type
    fn decode_word(
        &self,
        ty: &str,
        word: &[u8; WORD_SIZE],
        index: usize,
    ) -> Result<DecodedValue, DecodeError>;

    /// Decode consecutive slots, one per input
    ///
    /// Fails with `MissingSlot` when the payload holds fewer than
    /// `32 * inputs.len()` bytes. Trailing bytes are ignored.
    fn decode_arguments(
        &self,
        inputs: &[Argument],
        payload: &[u8],
    ) -> Result<Vec<DecodedParameter>, DecodeError> {
        let needed = WORD_SIZE * inputs.len();
        inputs
            .iter()
            .enumerate()
            .map(|(idx, input)| {
                let word = slot(payload, idx, needed)?;
                Ok(DecodedParameter {
                    name: input.display_name(idx),
                    raw_type: input.ty.clone(),
                    value: self.decode_word(&input.ty, word, idx)?,
                })
            })
            .collect()
    }

    /// Decode call input (including the 4-byte selector) for a matched method
    fn decode_call(&self, method: &AbiMethod, input: &[u8]) -> Result<DecodedCall, DecodeError> {
        let payload = input.get(4..).unwrap_or_default();
        Ok(DecodedCall {
            method_name: method.name().to_string(),
            signature: method.signature.text.clone(),
            selector: method.signature.selector_hex(),
            arguments: self.decode_arguments(&method.field.inputs, payload)?,
        })
    }

    /// Decode a log for a matched event
    ///
    /// Indexed inputs are read from topics[1..] in order; the rest occupy
    /// consecutive slots of the data region.
    fn decode_event(
        &self,
        method: &AbiMethod,
        address: Address,
        topics: &[B256],
        data: &[u8],
    ) -> Result<DecodedEvent, DecodeError> {
        let inputs = &method.field.inputs;
        let data_inputs = inputs.iter().filter(|input| !input.indexed).count();
        let needed = WORD_SIZE * data_inputs;

        let mut arguments = Vec::with_capacity(inputs.len());
        let mut next_topic = 1;
        let mut next_slot = 0;
        for (idx, input) in inputs.iter().enumerate() {
            let value = if input.indexed {
                let topic = topics.get(next_topic).ok_or(DecodeError::MissingTopic {
                    index: idx,
                    available: topics.len(),
                })?;
                next_topic += 1;
                self.decode_word(&input.ty, &topic.0, idx)?
            } else {
                let word = slot(data, next_slot, needed)?;
                next_slot += 1;
                self.decode_word(&input.ty, word, idx)?
            };

            arguments.push(DecodedParameter {
                name: input.display_name(idx),
                raw_type: input.ty.clone(),
                value,
            });
        }

        Ok(DecodedEvent {
            event_name: method.name().to_string(),
            signature: method.signature.text.clone(),
            topic: method.signature.hash_hex(),
            address,
            arguments,
        })
    }
}

/// Borrow slot `idx` of a payload expected to hold `needed` bytes
fn slot(payload: &[u8], idx: usize, needed: usize) -> Result<&[u8; WORD_SIZE], DecodeError> {
    let start = idx * WORD_SIZE;
    payload
        .get(start..start + WORD_SIZE)
        .and_then(|bytes| bytes.try_into().ok())
        .ok_or(DecodeError::MissingSlot {
            index: idx,
            needed,
            available: payload.len(),
        })
}
