//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from TOML. Every section
//! has defaults that reproduce the Fluent testnet deployment, so an empty
//! config file (or no file at all) is valid.

use alloy::primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Root configuration for the combiner.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Network endpoint settings.
    pub network: NetworkConfig,

    /// Addresses of the contracts the tool talks to.
    pub contracts: ContractsConfig,

    /// Lootbox prices per tier.
    pub pricing: PricingConfig,

    /// Gas price / gas limit fallbacks.
    pub fees: FeeConfig,

    /// Batch combine pacing.
    pub combine: CombineConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Failover JSON-RPC endpoint URLs, used for reads only.
    pub failover_urls: Vec<String>,

    /// Chain ID (20994 for Fluent testnet).
    pub chain_id: u64,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// How long to wait for a receipt before giving up.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://rpc.testnet.fluent.xyz".to_string(),
            failover_urls: Vec::new(),
            chain_id: 20994,
            rpc_timeout_secs: 15,
            confirmation_timeout_secs: 180,
            receipt_poll_interval_ms: 2000,
        }
    }
}

/// Contract addresses.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Lootbox contract (`openWithETH`).
    pub lootbox: Address,

    /// Marketplace contract (`buyCard`).
    pub marketplace: Address,

    /// Combine contract (`combineCards`, `paused`).
    pub combiner: Address,

    /// Bronze ERC-1155 collection. Scanned and combined.
    pub bronze_collection: Address,

    /// Silver ERC-1155 collection.
    pub silver_collection: Address,
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            lootbox: address!("7468edC3E94F8e6D1d198497C8b93AD638468047"),
            marketplace: address!("147b072d57bD5bB762871e13766DBA19AEF7bA8E"),
            combiner: address!("02715A523169f08c1005EE9B91FB767fd4C85A3a"),
            bronze_collection: address!("f56410f2365e97D585683270b9c90A312E9c38fD"),
            silver_collection: address!("4e1B2c561796951F76CEe2748b910a6d69ff985C"),
        }
    }
}

/// Lootbox prices, as decimal ether strings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PricingConfig {
    pub bronze_price_eth: String,
    pub silver_price_eth: String,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            bronze_price_eth: "0.005".to_string(),
            silver_price_eth: "0.085".to_string(),
        }
    }
}

/// Fee fallbacks used when the network cannot price a transaction.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FeeConfig {
    /// Gas price used when neither `eth_gasPrice` nor fee data answer.
    pub fallback_gas_price_gwei: String,

    /// Gas limit used when `eth_estimateGas` fails.
    pub fallback_gas_limit: u64,

    /// Percentage applied to a successful gas estimate (120 = +20%).
    pub gas_limit_margin_percent: u64,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            fallback_gas_price_gwei: "1.2".to_string(),
            fallback_gas_limit: 500_000,
            gas_limit_margin_percent: 120,
        }
    }
}

/// Batch combine pacing.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CombineConfig {
    /// Delay after every combine submission, in seconds.
    pub inter_group_delay_secs: u64,

    /// Delay between acquiring a card and combining in a full cycle.
    pub cycle_settle_delay_secs: u64,
}

impl Default for CombineConfig {
    fn default() -> Self {
        Self {
            inter_group_delay_secs: 15,
            cycle_settle_delay_secs: 10,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Expose a Prometheus scrape endpoint while running.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.network.chain_id, 20994);
        assert_eq!(config.fees.fallback_gas_limit, 500_000);
        assert_eq!(config.combine.inter_group_delay_secs, 15);
        assert_eq!(config.contracts.combiner, ContractsConfig::default().combiner);
    }

    #[test]
    fn test_partial_override() {
        let config: AppConfig = toml::from_str(
            r#"
            [network]
            rpc_url = "http://localhost:8545"
            chain_id = 31337

            [combine]
            inter_group_delay_secs = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.network.rpc_url, "http://localhost:8545");
        assert_eq!(config.network.chain_id, 31337);
        assert_eq!(config.network.rpc_timeout_secs, 15);
        assert_eq!(config.combine.inter_group_delay_secs, 1);
        assert_eq!(config.combine.cycle_settle_delay_secs, 10);
    }
}
