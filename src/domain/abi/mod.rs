//! ABI domain models and contracts
//!
//! This module defines the interface model, signature derivation, the
//! signature table and the decoder contract, independent of how ABI files
//! are read or how slots are turned into values.

mod decoder;
mod error;
mod field;
mod signature;
mod table;

pub use decoder::{
    AbiDecoder, DecodedCall, DecodedEvent, DecodedParameter, DecodedValue, Match, WORD_SIZE,
};
pub use error::{DecodeError, ParseError};
pub use field::{AbiField, Argument, FieldKind};
pub use signature::Signature;
pub use table::{AbiMethod, Collision, SignatureTable};
