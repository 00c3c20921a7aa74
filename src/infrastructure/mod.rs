//! Infrastructure layer - External service integrations
//!
//! This layer contains:
//! - Alloy-based Ethereum provider implementations
//! - ABI file loading and fixed-width slot decoding

pub mod abi;
pub mod ethereum;

pub use abi::{AbiLoader, SlotDecoder};
pub use ethereum::{create_provider, EthereumProvider, ProviderConfig};
