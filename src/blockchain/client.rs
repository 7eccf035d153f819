//! Blockchain RPC client with timeout and failover handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint (primary + optional read failovers)
//! - Answer the `ChainRpc` reads with per-call timeouts
//! - Sign and broadcast through the primary endpoint only
//! - Poll for receipts until confirmation or timeout

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::{BlockNumberOrTag, TransactionReceipt, TransactionRequest};
use alloy::transports::TransportError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::rpc::{rpc_reason, ChainRpc};
use crate::blockchain::types::{BlockchainError, BlockchainResult, ChainId, FeeData, TxReceipt};
use crate::blockchain::wallet::Wallet;
use crate::config::NetworkConfig;

type DynProvider = Arc<dyn Provider + Send + Sync>;

/// Alloy-backed implementation of [`ChainRpc`].
#[derive(Clone)]
pub struct BlockchainClient {
    /// Read providers (primary + failovers).
    providers: Vec<DynProvider>,
    /// Primary endpoint with the wallet attached.
    signing: DynProvider,
    signer: Address,
    config: NetworkConfig,
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new client for `wallet` on the configured network.
    ///
    /// Fails only on an unparsable primary URL; an unreachable node is logged
    /// and left for the first real call to report.
    pub async fn new(config: NetworkConfig, wallet: &Wallet) -> BlockchainResult<Self> {
        let timeout_duration = Duration::from_secs(config.rpc_timeout_secs);
        let mut providers = Vec::new();

        let primary_url: url::Url = config.rpc_url.parse().map_err(|e| {
            BlockchainError::Rpc(format!("Invalid RPC URL '{}': {}", config.rpc_url, e))
        })?;
        providers.push(
            Arc::new(ProviderBuilder::new().connect_http(primary_url.clone())) as DynProvider,
        );

        for url_str in &config.failover_urls {
            if let Ok(url) = url_str.parse() {
                providers.push(Arc::new(ProviderBuilder::new().connect_http(url)) as DynProvider);
            } else {
                tracing::warn!(url = %url_str, "Ignoring invalid failover RPC URL");
            }
        }

        let signing = Arc::new(
            ProviderBuilder::new()
                .wallet(wallet.ethereum_wallet())
                .connect_http(primary_url),
        ) as DynProvider;

        let client = Self {
            providers,
            signing,
            signer: wallet.address(),
            config: config.clone(),
            timeout_duration,
        };

        match client.verify_chain_id().await {
            Ok(()) => {
                tracing::info!(
                    rpc_url = %config.rpc_url,
                    chain_id = config.chain_id,
                    "Blockchain client initialized"
                );
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    "Blockchain client initialized but chain verification failed"
                );
            }
        }

        Ok(client)
    }

    /// Verify the connected chain ID matches configuration.
    pub async fn verify_chain_id(&self) -> BlockchainResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != self.config.chain_id {
            return Err(BlockchainError::ChainMismatch {
                expected: self.config.chain_id,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> BlockchainResult<ChainId> {
        self.read("chain id", |p| async move { p.get_chain_id().await })
            .await
            .map(ChainId)
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> BlockchainResult<Option<TransactionReceipt>> {
        self.read("receipt", move |p| async move {
            p.get_transaction_receipt(tx_hash).await
        })
        .await
    }

    /// Run a read against each provider in turn until one answers.
    async fn read<T, F, Fut>(&self, what: &'static str, f: F) -> BlockchainResult<T>
    where
        F: Fn(DynProvider) -> Fut,
        Fut: Future<Output = Result<T, TransportError>>,
    {
        let mut last_error = None;
        for (i, provider) in self.providers.iter().enumerate() {
            match timeout(self.timeout_duration, f(provider.clone())).await {
                Ok(Ok(result)) => return Ok(result),
                Ok(Err(e)) => {
                    tracing::debug!(provider_idx = i, call = what, error = %e, "RPC error");
                    last_error = Some(BlockchainError::Rpc(rpc_reason(&e)));
                }
                Err(_) => {
                    tracing::debug!(provider_idx = i, call = what, "RPC timeout");
                    last_error = Some(BlockchainError::Timeout(self.config.rpc_timeout_secs));
                }
            }
        }
        Err(last_error.unwrap_or_else(|| {
            BlockchainError::Rpc(format!("All RPC providers failed ({})", what))
        }))
    }
}

#[async_trait]
impl ChainRpc for BlockchainClient {
    fn signer_address(&self) -> Address {
        self.signer
    }

    fn chain_id(&self) -> u64 {
        self.config.chain_id
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.read("gas price", |p| async move { p.get_gas_price().await })
            .await
    }

    async fn fee_data(&self) -> BlockchainResult<FeeData> {
        let block = self
            .read("latest block", |p| async move {
                p.get_block_by_number(BlockNumberOrTag::Latest).await
            })
            .await?;
        let base_fee_per_gas = block
            .and_then(|block| block.header.base_fee_per_gas)
            .map(u128::from);

        let max_priority_fee_per_gas = match self
            .read("priority fee", |p| async move {
                p.get_max_priority_fee_per_gas().await
            })
            .await
        {
            Ok(tip) => Some(tip),
            Err(e) => {
                tracing::debug!(error = %e, "Priority fee unavailable");
                None
            }
        };

        Ok(FeeData {
            base_fee_per_gas,
            max_priority_fee_per_gas,
        })
    }

    async fn estimate_gas(&self, tx: &TransactionRequest) -> BlockchainResult<u64> {
        self.read("estimate gas", |p| {
            let tx = tx.clone();
            async move { p.estimate_gas(tx).await }
        })
        .await
    }

    async fn call(&self, tx: &TransactionRequest) -> BlockchainResult<Bytes> {
        self.read("call", |p| {
            let tx = tx.clone();
            async move { p.call(tx).await }
        })
        .await
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        match timeout(self.timeout_duration, self.signing.send_transaction(tx)).await {
            Ok(Ok(pending)) => Ok(*pending.tx_hash()),
            Ok(Err(e)) => Err(BlockchainError::Rpc(rpc_reason(&e))),
            Err(_) => Err(BlockchainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TxReceipt> {
        let timeout_duration = Duration::from_secs(self.config.confirmation_timeout_secs);
        let poll_interval = Duration::from_millis(self.config.receipt_poll_interval_ms);

        let result = timeout(timeout_duration, async {
            let mut ticker = interval(poll_interval);
            loop {
                ticker.tick().await;
                match self.get_transaction_receipt(tx_hash).await {
                    Ok(Some(receipt)) => return TxReceipt::from(receipt),
                    Ok(None) => tracing::debug!(tx_hash = %tx_hash, "Transaction pending"),
                    Err(e) => {
                        tracing::debug!(tx_hash = %tx_hash, error = %e, "Receipt poll failed")
                    }
                }
            }
        })
        .await;

        result.map_err(|_| BlockchainError::ConfirmationTimeout(tx_hash))
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.config.rpc_url)
            .field("chain_id", &self.config.chain_id)
            .field("signer", &self.signer)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}
