//! Ethereum provider abstraction and Alloy implementations
//!
//! Blocks, transactions and receipts are fetched with raw JSON requests so
//! every EVM chain parses, including ones with non-standard transaction types.

use std::path::PathBuf;

use alloy::eips::BlockId;
use alloy::network::Ethereum;
use alloy::primitives::{Address, Bytes, B256, U256};
use alloy::providers::{
    fillers::{BlobGasFiller, ChainIdFiller, FillProvider, GasFiller, JoinFill, NonceFiller},
    Identity, Provider, ProviderBuilder, RootProvider,
};
use alloy::rpc::types::{Filter, TransactionRequest};
use anyhow::{bail, Context, Result};
use futures::StreamExt;
use tokio::sync::mpsc;
use tracing::debug;

use super::types::{
    parse_raw_block, parse_raw_receipt, parse_raw_transaction, RawBlock, RawLog, RawReceipt,
    RawTransaction,
};

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    /// HTTP JSON-RPC endpoint
    Http(String),
    /// WebSocket endpoint
    WebSocket(String),
    /// IPC socket path (Unix only)
    #[cfg(unix)]
    Ipc(PathBuf),
}

impl ProviderConfig {
    /// Pick a transport from a node URI
    ///
    /// `ws://`/`wss://` select WebSocket, `http://`/`https://` select HTTP,
    /// paths ending in `.ipc` select IPC, and anything else is treated as a
    /// bare `host:port` HTTP endpoint.
    pub fn from_uri(uri: &str) -> Result<Self> {
        let trimmed = uri.trim();
        if trimmed.is_empty() {
            bail!("Empty node URI");
        }

        if trimmed.starts_with("ws://") || trimmed.starts_with("wss://") {
            return Ok(ProviderConfig::WebSocket(trimmed.to_string()));
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(ProviderConfig::Http(trimmed.to_string()));
        }
        if trimmed.ends_with(".ipc") {
            #[cfg(unix)]
            {
                return Ok(ProviderConfig::Ipc(crate::config::expand_path(trimmed)));
            }
            #[cfg(not(unix))]
            {
                bail!("IPC is not supported on this platform");
            }
        }

        Ok(ProviderConfig::Http(format!("http://{}", trimmed)))
    }

    /// Get display name for this endpoint
    pub fn display(&self) -> String {
        match self {
            ProviderConfig::Http(url) => url.clone(),
            ProviderConfig::WebSocket(url) => url.clone(),
            #[cfg(unix)]
            ProviderConfig::Ipc(path) => path.display().to_string(),
        }
    }

    /// Check if this is a WebSocket endpoint
    pub fn is_websocket(&self) -> bool {
        matches!(self, ProviderConfig::WebSocket(_))
    }
}

/// Abstract Ethereum provider trait
///
/// The node operations the CLI needs, independent of the Alloy transport.
#[async_trait::async_trait]
pub trait EthereumProvider: Send + Sync + 'static {
    /// Get the current block number
    async fn block_number(&self) -> Result<u64>;

    /// Get a block by number with full transactions
    async fn get_block(&self, number: u64) -> Result<Option<RawBlock>>;

    /// Get a block by hash with full transactions
    async fn get_block_by_hash(&self, hash: B256) -> Result<Option<RawBlock>>;

    /// Get a transaction by hash (pending transactions have no block number)
    async fn get_transaction(&self, hash: B256) -> Result<Option<RawTransaction>>;

    /// Get transaction receipt
    async fn get_receipt(&self, hash: B256) -> Result<Option<RawReceipt>>;

    /// Get account balance at a block (latest when `None`)
    async fn get_balance(&self, address: Address, block: Option<u64>) -> Result<U256>;

    /// Execute a read-only call (eth_call) at a block (latest when `None`)
    async fn call(&self, request: TransactionRequest, block: Option<u64>) -> Result<Bytes>;

    /// Subscribe to logs emitted by an address, starting at a block
    async fn subscribe_logs(&self, address: Address, from_block: u64)
        -> Result<mpsc::Receiver<RawLog>>;

    /// Check if subscriptions are supported
    fn supports_subscriptions(&self) -> bool;

    /// Get endpoint display name
    fn endpoint_name(&self) -> String;
}

// Type aliases for the filled providers
type HttpFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

type WsFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

#[cfg(unix)]
type IpcFillProvider = FillProvider<
    JoinFill<
        Identity,
        JoinFill<GasFiller, JoinFill<BlobGasFiller, JoinFill<NonceFiller, ChainIdFiller>>>,
    >,
    RootProvider,
    Ethereum,
>;

/// Enum-based provider that stores concrete types for each transport
pub enum AlloyProvider {
    Http {
        provider: HttpFillProvider,
        endpoint: String,
    },
    WebSocket {
        provider: WsFillProvider,
        endpoint: String,
    },
    #[cfg(unix)]
    Ipc {
        provider: IpcFillProvider,
        endpoint: String,
    },
}

/// Create a provider from configuration
pub async fn create_provider(config: ProviderConfig) -> Result<Box<dyn EthereumProvider>> {
    debug!(endpoint = %config.display(), "connecting");
    match config {
        ProviderConfig::Http(url) => {
            let rpc_url = url.parse().context("Invalid HTTP URL")?;
            let provider = ProviderBuilder::new().connect_http(rpc_url);
            Ok(Box::new(AlloyProvider::Http {
                provider,
                endpoint: url,
            }))
        }
        ProviderConfig::WebSocket(url) => {
            let provider = ProviderBuilder::new()
                .connect(&url)
                .await
                .context("Failed to create WebSocket provider")?;
            Ok(Box::new(AlloyProvider::WebSocket {
                provider,
                endpoint: url,
            }))
        }
        #[cfg(unix)]
        ProviderConfig::Ipc(path) => {
            use alloy::providers::IpcConnect;
            let ipc_path = path.to_string_lossy().to_string();
            let ipc = IpcConnect::new(ipc_path);
            let provider = ProviderBuilder::new()
                .connect_ipc(ipc)
                .await
                .context("Failed to create IPC provider")?;
            let display = path.display().to_string();
            Ok(Box::new(AlloyProvider::Ipc {
                provider,
                endpoint: display,
            }))
        }
    }
}

// Macro to reduce code duplication for provider method implementations
macro_rules! impl_provider_method {
    ($self:ident, $method:ident $(, $arg:expr)*) => {
        match $self {
            AlloyProvider::Http { provider, .. } => provider.$method($($arg),*).await,
            AlloyProvider::WebSocket { provider, .. } => provider.$method($($arg),*).await,
            #[cfg(unix)]
            AlloyProvider::Ipc { provider, .. } => provider.$method($($arg),*).await,
        }
    };
}

// Same dispatch for raw JSON-RPC requests
macro_rules! raw_request {
    ($self:ident, $method:literal, $params:expr) => {
        match $self {
            AlloyProvider::Http { provider, .. } => {
                provider.raw_request($method.into(), $params).await
            }
            AlloyProvider::WebSocket { provider, .. } => {
                provider.raw_request($method.into(), $params).await
            }
            #[cfg(unix)]
            AlloyProvider::Ipc { provider, .. } => {
                provider.raw_request($method.into(), $params).await
            }
        }
    };
}

/// Block tag for a raw request: hex number or "latest"
fn block_tag(block: Option<u64>) -> String {
    match block {
        Some(number) => format!("0x{:x}", number),
        None => "latest".to_string(),
    }
}

#[async_trait::async_trait]
impl EthereumProvider for AlloyProvider {
    async fn block_number(&self) -> Result<u64> {
        Ok(impl_provider_method!(self, get_block_number)?)
    }

    async fn get_block(&self, number: u64) -> Result<Option<RawBlock>> {
        let block_num_hex = format!("0x{:x}", number);
        let json: serde_json::Value =
            raw_request!(self, "eth_getBlockByNumber", (&block_num_hex, true))?;

        if json.is_null() {
            return Ok(None);
        }

        Ok(Some(parse_raw_block(&json)?))
    }

    async fn get_block_by_hash(&self, hash: B256) -> Result<Option<RawBlock>> {
        let json: serde_json::Value = raw_request!(self, "eth_getBlockByHash", (hash, true))?;

        if json.is_null() {
            return Ok(None);
        }

        Ok(Some(parse_raw_block(&json)?))
    }

    async fn get_transaction(&self, hash: B256) -> Result<Option<RawTransaction>> {
        let json: serde_json::Value = raw_request!(self, "eth_getTransactionByHash", (hash,))?;

        if json.is_null() {
            return Ok(None);
        }

        parse_raw_transaction(&json)
            .map(Some)
            .context("Malformed transaction response")
    }

    async fn get_receipt(&self, hash: B256) -> Result<Option<RawReceipt>> {
        let json: serde_json::Value = raw_request!(self, "eth_getTransactionReceipt", (hash,))?;

        if json.is_null() {
            return Ok(None);
        }

        Ok(Some(parse_raw_receipt(&json)?))
    }

    async fn get_balance(&self, address: Address, block: Option<u64>) -> Result<U256> {
        let tag = block_tag(block);
        Ok(raw_request!(self, "eth_getBalance", (address, &tag))?)
    }

    async fn call(&self, request: TransactionRequest, block: Option<u64>) -> Result<Bytes> {
        let block_id = block.map(BlockId::number).unwrap_or_else(BlockId::latest);
        match self {
            AlloyProvider::Http { provider, .. } => {
                Ok(provider.call(request).block(block_id).await?)
            }
            AlloyProvider::WebSocket { provider, .. } => {
                Ok(provider.call(request).block(block_id).await?)
            }
            #[cfg(unix)]
            AlloyProvider::Ipc { provider, .. } => {
                Ok(provider.call(request).block(block_id).await?)
            }
        }
    }

    async fn subscribe_logs(
        &self,
        address: Address,
        from_block: u64,
    ) -> Result<mpsc::Receiver<RawLog>> {
        let filter = Filter::new().address(address).from_block(from_block);

        let sub = match self {
            AlloyProvider::Http { .. } => {
                bail!("Log subscriptions require a WebSocket or IPC endpoint");
            }
            AlloyProvider::WebSocket { provider, .. } => provider.subscribe_logs(&filter).await?,
            #[cfg(unix)]
            AlloyProvider::Ipc { provider, .. } => provider.subscribe_logs(&filter).await?,
        };

        let (tx, rx) = mpsc::channel(100);
        tokio::spawn(async move {
            let mut stream = sub.into_stream();
            while let Some(log) = stream.next().await {
                if tx.send(RawLog::from(log)).await.is_err() {
                    break;
                }
            }
        });

        Ok(rx)
    }

    fn supports_subscriptions(&self) -> bool {
        match self {
            AlloyProvider::Http { .. } => false,
            AlloyProvider::WebSocket { .. } => true,
            #[cfg(unix)]
            AlloyProvider::Ipc { .. } => true,
        }
    }

    fn endpoint_name(&self) -> String {
        match self {
            AlloyProvider::Http { endpoint, .. } => endpoint.clone(),
            AlloyProvider::WebSocket { endpoint, .. } => endpoint.clone(),
            #[cfg(unix)]
            AlloyProvider::Ipc { endpoint, .. } => endpoint.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_config_from_uri() {
        assert_eq!(
            ProviderConfig::from_uri("http://localhost:8545").unwrap(),
            ProviderConfig::Http("http://localhost:8545".to_string())
        );
        assert_eq!(
            ProviderConfig::from_uri("localhost:8545").unwrap(),
            ProviderConfig::Http("http://localhost:8545".to_string())
        );
        assert!(ProviderConfig::from_uri("wss://node.example/ws")
            .unwrap()
            .is_websocket());
        assert!(ProviderConfig::from_uri("  ").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_provider_config_ipc() {
        assert_eq!(
            ProviderConfig::from_uri("/tmp/geth.ipc").unwrap(),
            ProviderConfig::Ipc(PathBuf::from("/tmp/geth.ipc"))
        );
    }

    #[test]
    fn test_block_tag() {
        assert_eq!(block_tag(None), "latest");
        assert_eq!(block_tag(Some(255)), "0xff");
    }
}
