//! Fee & gas estimation.
//!
//! Gas price comes from an ordered chain of sources; the first one that
//! answers wins and the configured constant closes the chain. Gas limit is the
//! node's estimate plus a margin, or a fixed fallback. Neither half can fail.

use async_trait::async_trait;

use crate::blockchain::contracts::PendingCall;
use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult, FeeQuote, PriceSource};
use crate::observability::metrics;

/// 1.2 gwei.
pub const DEFAULT_FALLBACK_GAS_PRICE: u128 = 1_200_000_000;
pub const DEFAULT_FALLBACK_GAS_LIMIT: u64 = 500_000;
/// Estimate × 120 / 100.
pub const DEFAULT_GAS_LIMIT_MARGIN_PERCENT: u64 = 120;

/// One step of the gas price chain.
#[async_trait]
pub trait GasPriceSource: Send + Sync {
    fn source(&self) -> PriceSource;

    async fn gas_price(&self, rpc: &dyn ChainRpc) -> BlockchainResult<u128>;
}

/// `eth_gasPrice`.
pub struct NodeGasPrice;

#[async_trait]
impl GasPriceSource for NodeGasPrice {
    fn source(&self) -> PriceSource {
        PriceSource::Node
    }

    async fn gas_price(&self, rpc: &dyn ChainRpc) -> BlockchainResult<u128> {
        rpc.gas_price().await
    }
}

/// Latest base fee plus the node's suggested tip.
pub struct FeeDataGasPrice;

#[async_trait]
impl GasPriceSource for FeeDataGasPrice {
    fn source(&self) -> PriceSource {
        PriceSource::FeeData
    }

    async fn gas_price(&self, rpc: &dyn ChainRpc) -> BlockchainResult<u128> {
        rpc.fee_data()
            .await?
            .legacy_gas_price()
            .ok_or_else(|| BlockchainError::Rpc("fee data carries no base fee".to_string()))
    }
}

/// Apply the safety margin to a gas estimate, rounding toward zero.
pub fn apply_margin(estimate: u64, margin_percent: u64) -> u64 {
    let padded = estimate as u128 * margin_percent as u128 / 100;
    u64::try_from(padded).unwrap_or(u64::MAX)
}

/// Produces a fresh [`FeeQuote`] for every submission.
pub struct FeeEstimator {
    sources: Vec<Box<dyn GasPriceSource>>,
    fallback_gas_price: u128,
    fallback_gas_limit: u64,
    margin_percent: u64,
}

impl FeeEstimator {
    /// Node price, then fee data, then `fallback_gas_price`.
    pub fn new(fallback_gas_price: u128, fallback_gas_limit: u64, margin_percent: u64) -> Self {
        Self::with_sources(
            vec![Box::new(NodeGasPrice), Box::new(FeeDataGasPrice)],
            fallback_gas_price,
            fallback_gas_limit,
            margin_percent,
        )
    }

    pub fn with_sources(
        sources: Vec<Box<dyn GasPriceSource>>,
        fallback_gas_price: u128,
        fallback_gas_limit: u64,
        margin_percent: u64,
    ) -> Self {
        Self {
            sources,
            fallback_gas_price,
            fallback_gas_limit,
            margin_percent,
        }
    }

    /// Price and budget for `call`. Never fails.
    pub async fn quote(&self, rpc: &dyn ChainRpc, call: &PendingCall) -> FeeQuote {
        let (gas_price, price_source) = self.resolve_gas_price(rpc).await;
        let (gas_limit, limit_estimated) = self.resolve_gas_limit(rpc, call).await;

        tracing::debug!(
            function = call.function,
            gas_price = gas_price,
            price_source = price_source.as_str(),
            gas_limit = gas_limit,
            limit_estimated = limit_estimated,
            "Fee quote"
        );

        FeeQuote {
            gas_price,
            gas_limit,
            price_source,
            limit_estimated,
        }
    }

    /// Walk the source chain; the constant answers when nothing else does.
    pub async fn resolve_gas_price(&self, rpc: &dyn ChainRpc) -> (u128, PriceSource) {
        for source in &self.sources {
            match source.gas_price(rpc).await {
                Ok(price) => return (price, source.source()),
                Err(e) => {
                    tracing::debug!(
                        source = source.source().as_str(),
                        error = %e,
                        "Gas price source failed"
                    );
                }
            }
        }
        tracing::warn!(
            gas_price = self.fallback_gas_price,
            "Gas price unavailable, using fallback"
        );
        metrics::record_fee_fallback("gas_price");
        (self.fallback_gas_price, PriceSource::Fallback)
    }

    pub async fn resolve_gas_limit(&self, rpc: &dyn ChainRpc, call: &PendingCall) -> (u64, bool) {
        let request = call.to_request(rpc.signer_address());
        match rpc.estimate_gas(&request).await {
            Ok(estimate) => (apply_margin(estimate, self.margin_percent), true),
            Err(e) => {
                tracing::warn!(
                    function = call.function,
                    error = %e,
                    "Gas estimation failed, using default {}",
                    self.fallback_gas_limit
                );
                metrics::record_fee_fallback("gas_limit");
                (self.fallback_gas_limit, false)
            }
        }
    }
}

impl Default for FeeEstimator {
    fn default() -> Self {
        Self::new(
            DEFAULT_FALLBACK_GAS_PRICE,
            DEFAULT_FALLBACK_GAS_LIMIT,
            DEFAULT_GAS_LIMIT_MARGIN_PERCENT,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_margin_rounds_toward_zero() {
        assert_eq!(apply_margin(100_000, 120), 120_000);
        assert_eq!(apply_margin(21_001, 120), 25_201);
        assert_eq!(apply_margin(1, 120), 1);
        assert_eq!(apply_margin(0, 120), 0);
    }

    #[test]
    fn test_margin_saturates() {
        assert_eq!(apply_margin(u64::MAX, 120), u64::MAX);
    }

    #[test]
    fn test_margin_matches_floor_formula() {
        for estimate in [7u64, 33, 999, 46_271, 123_457] {
            assert_eq!(apply_margin(estimate, 120), estimate * 120 / 100);
        }
    }
}
