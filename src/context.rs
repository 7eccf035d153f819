//! The explicit context every operation runs against.

use alloy::primitives::{Address, U256};
use std::sync::Arc;
use std::time::Duration;

use crate::blockchain::fees::FeeEstimator;
use crate::blockchain::rpc::ChainRpc;
use crate::config::validation::{parse_eth_amount, parse_gwei_amount};
use crate::config::{AppConfig, ConfigError, ContractsConfig};

/// Network handle, contract addresses and tunables for one signer.
pub struct ChainContext {
    pub rpc: Arc<dyn ChainRpc>,
    pub contracts: ContractsConfig,
    pub fees: FeeEstimator,
    pub bronze_price: U256,
    pub silver_price: U256,
    /// Pause after every combine submission.
    pub inter_group_delay: Duration,
    /// Pause between acquiring a card and combining in a full cycle.
    pub cycle_settle_delay: Duration,
}

impl ChainContext {
    /// Build from a validated config.
    pub fn from_config(rpc: Arc<dyn ChainRpc>, config: &AppConfig) -> Result<Self, ConfigError> {
        let invalid = |field: &'static str, message: String| {
            ConfigError::Validation(vec![crate::config::validation::ValidationError {
                field,
                message,
            }])
        };

        let bronze_price = parse_eth_amount(&config.pricing.bronze_price_eth)
            .map_err(|e| invalid("pricing.bronze_price_eth", e))?;
        let silver_price = parse_eth_amount(&config.pricing.silver_price_eth)
            .map_err(|e| invalid("pricing.silver_price_eth", e))?;
        let fallback_gas_price = parse_gwei_amount(&config.fees.fallback_gas_price_gwei)
            .map_err(|e| invalid("fees.fallback_gas_price_gwei", e))?;

        Ok(Self {
            rpc,
            contracts: config.contracts.clone(),
            fees: FeeEstimator::new(
                fallback_gas_price,
                config.fees.fallback_gas_limit,
                config.fees.gas_limit_margin_percent,
            ),
            bronze_price,
            silver_price,
            inter_group_delay: Duration::from_secs(config.combine.inter_group_delay_secs),
            cycle_settle_delay: Duration::from_secs(config.combine.cycle_settle_delay_secs),
        })
    }

    pub fn signer(&self) -> Address {
        self.rpc.signer_address()
    }

    pub fn rpc(&self) -> &dyn ChainRpc {
        self.rpc.as_ref()
    }
}
