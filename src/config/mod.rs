use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const DEFAULT_NODE_URI: &str = "http://localhost:8545";

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Node endpoint: http(s)/ws(s) URL or IPC path
    #[serde(default)]
    pub node_uri: Option<String>,

    /// Token symbol → contract address
    #[serde(default)]
    pub contracts: BTreeMap<String, String>,
}

impl Config {
    /// Node URI, falling back to the local default
    pub fn node_uri(&self) -> &str {
        self.node_uri
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_NODE_URI)
    }

    /// Resolve a token symbol to its configured address
    ///
    /// Exact symbol first, then a case-insensitive match.
    pub fn token_address(&self, symbol: &str) -> Option<&str> {
        let symbol = symbol.trim();
        self.contracts
            .get(symbol)
            .or_else(|| {
                self.contracts
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case(symbol))
                    .map(|(_, address)| address)
            })
            .map(|address| address.trim())
            .filter(|address| !address.is_empty())
    }
}

/// Load the config file
///
/// A missing file yields the defaults; a file that exists but does not parse
/// is an error.
pub fn load(explicit: Option<&Path>) -> Result<Config> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => match config_path() {
            Some(path) => path,
            None => return Ok(Config::default()),
        },
    };

    if explicit.is_none() && !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
}

pub fn parse(content: &str) -> Result<Config> {
    Ok(toml::from_str::<Config>(content)?)
}

pub fn config_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("ETHUTIL_CONFIG").map(PathBuf::from) {
        return Some(path);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from) {
        return Some(xdg.join("ethutil").join("config.toml"));
    }
    if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
        return Some(home.join(".config").join("ethutil").join("config.toml"));
    }

    directories::ProjectDirs::from("io", "ethutil", "ethutil")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Expand `~/` and make relative paths absolute
pub fn expand_path(path: &str) -> PathBuf {
    let trimmed = path.trim();

    if let Some(rest) = trimmed.strip_prefix("~/") {
        if let Some(home) = std::env::var_os("HOME").map(PathBuf::from) {
            return home.join(rest);
        }
    }

    let mut buf = PathBuf::from(trimmed);
    if buf.is_relative() {
        if let Ok(cwd) = std::env::current_dir() {
            buf = cwd.join(buf);
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let config = parse(
            r#"
            node_uri = "ws://127.0.0.1:8546"

            [contracts]
            USDC = "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"
            "#,
        )
        .unwrap();

        assert_eq!(config.node_uri(), "ws://127.0.0.1:8546");
        assert_eq!(
            config.token_address("USDC"),
            Some("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
        );
        assert_eq!(
            config.token_address("usdc"),
            Some("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48")
        );
        assert_eq!(config.token_address("DAI"), None);
    }

    #[test]
    fn test_defaults() {
        let config = parse("").unwrap();
        assert_eq!(config.node_uri(), DEFAULT_NODE_URI);
        assert!(config.contracts.is_empty());
    }

    #[test]
    fn test_malformed_config_is_error() {
        assert!(parse("node_uri = [1, 2").is_err());
    }

    #[test]
    fn test_load_explicit_missing_file_is_error() {
        assert!(load(Some(Path::new("/definitely/not/here.toml"))).is_err());
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "node_uri = \"http://10.0.0.1:8545\"\n").unwrap();

        let config = load(Some(&path)).unwrap();
        assert_eq!(config.node_uri(), "http://10.0.0.1:8545");
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/tmp/geth.ipc"), PathBuf::from("/tmp/geth.ipc"));
        assert!(expand_path("geth.ipc").is_absolute());
    }
}
