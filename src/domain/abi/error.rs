//! Error types for ABI parsing and parameter decoding

use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn an ABI description file into fields
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("failed to read ABI file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse ABI file {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failure to decode the parameters of a single matched call or event
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("payload too short: slot {index} is missing (need {needed} bytes, got {available})")]
    MissingSlot {
        index: usize,
        needed: usize,
        available: usize,
    },

    #[error("no topic for indexed argument {index} (log has {available} topics)")]
    MissingTopic { index: usize, available: usize },

    #[error("value in slot {index} exceeds 256 bits")]
    Overflow { index: usize },
}
