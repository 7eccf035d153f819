//! Chain-specific types and error definitions.

use alloy::primitives::{Log, TxHash};
use alloy::rpc::types::TransactionReceipt;
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed. Holds the node's message when it sent one.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {0} not confirmed in time")]
    ConfirmationTimeout(TxHash),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Return data or log data did not match the expected ABI shape.
    #[error("Decode error: {0}")]
    Decode(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// Where a quote's gas price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// `eth_gasPrice`.
    Node,
    /// Latest base fee plus priority fee.
    FeeData,
    /// The configured constant.
    Fallback,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::Node => "node",
            PriceSource::FeeData => "fee_data",
            PriceSource::Fallback => "fallback",
        }
    }
}

/// Gas price and gas limit for exactly one submission.
///
/// Not `Clone`. The submitter consumes it.
#[derive(Debug, PartialEq, Eq)]
pub struct FeeQuote {
    /// Legacy gas price in wei.
    pub gas_price: u128,
    /// Gas limit.
    pub gas_limit: u64,
    pub price_source: PriceSource,
    /// False when the limit is the fallback constant.
    pub limit_estimated: bool,
}

/// Confirmed transaction as seen by the rest of the crate.
#[derive(Debug, Clone)]
pub struct TxReceipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    /// False when the transaction reverted.
    pub status: bool,
    /// Emitted logs in order.
    pub logs: Vec<Log>,
}

impl From<TransactionReceipt> for TxReceipt {
    fn from(receipt: TransactionReceipt) -> Self {
        Self {
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            status: receipt.status(),
            logs: receipt
                .inner
                .logs()
                .iter()
                .map(|log| log.inner.clone())
                .collect(),
        }
    }
}

/// Fee data reported by the network.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeData {
    /// Base fee of the latest block; `None` on pre-London chains.
    pub base_fee_per_gas: Option<u128>,
    pub max_priority_fee_per_gas: Option<u128>,
}

impl FeeData {
    /// What a legacy transaction should pay: base fee plus tip.
    ///
    /// A missing tip counts as zero; a missing base fee yields `None`.
    pub fn legacy_gas_price(&self) -> Option<u128> {
        let base = self.base_fee_per_gas?;
        Some(base.saturating_add(self.max_priority_fee_per_gas.unwrap_or(0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chain_id_conversion() {
        let chain_id = ChainId::from(20994u64);
        assert_eq!(chain_id.0, 20994);
        assert_eq!(u64::from(chain_id), 20994);
    }

    #[test]
    fn test_error_display() {
        let err = BlockchainError::Timeout(10);
        assert_eq!(err.to_string(), "RPC timeout after 10 seconds");

        let err = BlockchainError::ChainMismatch {
            expected: 20994,
            actual: 1,
        };
        assert!(err.to_string().contains("20994"));
    }

    #[test]
    fn test_legacy_gas_price_is_base_plus_tip() {
        let fees = FeeData {
            base_fee_per_gas: Some(1_000_000_000),
            max_priority_fee_per_gas: Some(250_000_000),
        };
        assert_eq!(fees.legacy_gas_price(), Some(1_250_000_000));

        let no_tip = FeeData {
            base_fee_per_gas: Some(7),
            max_priority_fee_per_gas: None,
        };
        assert_eq!(no_tip.legacy_gas_price(), Some(7));

        let no_base = FeeData {
            base_fee_per_gas: None,
            max_priority_fee_per_gas: Some(1),
        };
        assert_eq!(no_base.legacy_gas_price(), None);
    }

    #[test]
    fn test_price_source_labels() {
        assert_eq!(PriceSource::Node.as_str(), "node");
        assert_eq!(PriceSource::Fallback.as_str(), "fallback");
    }
}
