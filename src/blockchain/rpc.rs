//! Network boundary.
//!
//! Everything the crate needs from a JSON-RPC node, as one object-safe trait.
//! `BlockchainClient` implements it over alloy providers; tests implement it
//! in memory.

use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::TransactionRequest;
use alloy::transports::TransportError;
use async_trait::async_trait;

use crate::blockchain::types::{BlockchainError, BlockchainResult, FeeData, TxReceipt};

#[async_trait]
pub trait ChainRpc: Send + Sync {
    /// Address of the signer that owns every outbound transaction.
    fn signer_address(&self) -> Address;

    /// Chain ID used for EIP-155 signing.
    fn chain_id(&self) -> u64;

    /// `eth_gasPrice`.
    async fn gas_price(&self) -> BlockchainResult<u128>;

    /// Fee data as the node reports it.
    async fn fee_data(&self) -> BlockchainResult<FeeData>;

    /// `eth_estimateGas` for the request.
    async fn estimate_gas(&self, tx: &TransactionRequest) -> BlockchainResult<u64>;

    /// Read-only `eth_call`, returning raw return data.
    async fn call(&self, tx: &TransactionRequest) -> BlockchainResult<Bytes>;

    /// Sign and broadcast. Returns once the node accepted the transaction.
    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash>;

    /// Block until the transaction is mined, or the confirmation timeout hits.
    async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TxReceipt>;
}

/// Human-readable reason from an RPC failure.
///
/// Prefers the node's error payload message ("execution reverted: Paused")
/// over the transport's full error chain.
pub fn rpc_reason(err: &TransportError) -> String {
    match err.as_error_resp() {
        Some(payload) => payload.message.to_string(),
        None => err.to_string(),
    }
}

impl From<TransportError> for BlockchainError {
    fn from(err: TransportError) -> Self {
        BlockchainError::Rpc(rpc_reason(&err))
    }
}
