//! ABI file loader - reads interface descriptions from disk

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::domain::abi::{AbiField, ParseError};

/// Build artifact shape: `{ "abi": [...] }`
#[derive(Debug, Deserialize)]
struct WrappedAbi {
    abi: Vec<AbiField>,
}

/// ABI file loader
pub struct AbiLoader;

impl AbiLoader {
    /// Load an ABI description file
    ///
    /// `.json` files are probed for the wrapped `{ "abi": [...] }` shape
    /// first; every other extension starts with the bare array. Either way the
    /// other shape is tried before giving up.
    pub fn load(path: impl AsRef<Path>) -> Result<Vec<AbiField>, ParseError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ParseError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let fields = Self::parse(&content, Self::prefers_wrapped(path)).map_err(|source| {
            ParseError::Malformed {
                path: path.to_path_buf(),
                source,
            }
        })?;

        debug!(path = %path.display(), fields = fields.len(), "loaded ABI");
        Ok(fields)
    }

    /// Parse ABI content; on failure the error of the preferred shape is returned
    pub fn parse(content: &str, wrapped_first: bool) -> Result<Vec<AbiField>, serde_json::Error> {
        if wrapped_first {
            match serde_json::from_str::<WrappedAbi>(content) {
                Ok(wrapped) => Ok(wrapped.abi),
                Err(err) => serde_json::from_str::<Vec<AbiField>>(content).map_err(|_| err),
            }
        } else {
            match serde_json::from_str::<Vec<AbiField>>(content) {
                Ok(fields) => Ok(fields),
                Err(err) => serde_json::from_str::<WrappedAbi>(content)
                    .map(|wrapped| wrapped.abi)
                    .map_err(|_| err),
            }
        }
    }

    fn prefers_wrapped(path: &Path) -> bool {
        path.extension().and_then(|s| s.to_str()) == Some("json")
    }
}
