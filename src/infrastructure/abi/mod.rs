//! ABI infrastructure - file loading and slot decoding

mod decoder;
mod loader;

pub use decoder::SlotDecoder;
pub use loader::AbiLoader;
