//! Domain layer - ABI model, signatures and decoding contracts

pub mod abi;
