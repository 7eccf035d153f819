//! Configuration validation.
//!
//! Serde handles syntax; this module checks values. Validation is a pure
//! function `AppConfig → Result<(), Vec<ValidationError>>` that reports every
//! problem at once instead of stopping at the first.

use alloy::primitives::utils::{parse_ether, parse_units};
use alloy::primitives::U256;
use std::fmt;
use std::net::SocketAddr;
use tracing_subscriber::filter::LevelFilter;

use crate::config::schema::AppConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Parse a decimal ether amount ("0.005") into wei.
pub fn parse_eth_amount(value: &str) -> Result<U256, String> {
    parse_ether(value.trim()).map_err(|e| format!("invalid ether amount '{}': {}", value, e))
}

/// Parse a decimal gwei amount ("1.2") into wei.
pub fn parse_gwei_amount(value: &str) -> Result<u128, String> {
    let wei: U256 = parse_units(value.trim(), "gwei")
        .map_err(|e| format!("invalid gwei amount '{}': {}", value, e))?
        .into();
    u128::try_from(wei).map_err(|_| format!("gwei amount '{}' is out of range", value))
}

/// Validate a loaded configuration.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Err(e) = config.network.rpc_url.parse::<url::Url>() {
        errors.push(ValidationError::new(
            "network.rpc_url",
            format!("'{}' is not a valid URL: {}", config.network.rpc_url, e),
        ));
    }
    for failover in &config.network.failover_urls {
        if failover.parse::<url::Url>().is_err() {
            errors.push(ValidationError::new(
                "network.failover_urls",
                format!("'{}' is not a valid URL", failover),
            ));
        }
    }
    if config.network.chain_id == 0 {
        errors.push(ValidationError::new("network.chain_id", "must be non-zero"));
    }
    if config.network.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("network.rpc_timeout_secs", "must be > 0"));
    }
    if config.network.confirmation_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "network.confirmation_timeout_secs",
            "must be > 0",
        ));
    }
    if config.network.receipt_poll_interval_ms == 0 {
        errors.push(ValidationError::new(
            "network.receipt_poll_interval_ms",
            "must be > 0",
        ));
    }

    let contracts = [
        ("contracts.lootbox", config.contracts.lootbox),
        ("contracts.marketplace", config.contracts.marketplace),
        ("contracts.combiner", config.contracts.combiner),
        ("contracts.bronze_collection", config.contracts.bronze_collection),
        ("contracts.silver_collection", config.contracts.silver_collection),
    ];
    for (field, address) in contracts {
        if address.is_zero() {
            errors.push(ValidationError::new(field, "must not be the zero address"));
        }
    }

    if let Err(e) = parse_eth_amount(&config.pricing.bronze_price_eth) {
        errors.push(ValidationError::new("pricing.bronze_price_eth", e));
    }
    if let Err(e) = parse_eth_amount(&config.pricing.silver_price_eth) {
        errors.push(ValidationError::new("pricing.silver_price_eth", e));
    }

    match parse_gwei_amount(&config.fees.fallback_gas_price_gwei) {
        Ok(0) => errors.push(ValidationError::new(
            "fees.fallback_gas_price_gwei",
            "must be > 0",
        )),
        Ok(_) => {}
        Err(e) => errors.push(ValidationError::new("fees.fallback_gas_price_gwei", e)),
    }
    if config.fees.fallback_gas_limit == 0 {
        errors.push(ValidationError::new("fees.fallback_gas_limit", "must be > 0"));
    }
    if config.fees.gas_limit_margin_percent < 100 {
        errors.push(ValidationError::new(
            "fees.gas_limit_margin_percent",
            "must be at least 100",
        ));
    }

    if config
        .observability
        .log_level
        .parse::<LevelFilter>()
        .is_err()
    {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "'{}' is not one of off, error, warn, info, debug, trace",
                config.observability.log_level
            ),
        ));
    }
    if config
        .observability
        .metrics_address
        .parse::<SocketAddr>()
        .is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::Address;

    #[test]
    fn test_defaults_are_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = AppConfig::default();
        config.network.rpc_url = "not a url".to_string();
        config.contracts.combiner = Address::ZERO;
        config.fees.fallback_gas_limit = 0;

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["network.rpc_url", "contracts.combiner", "fees.fallback_gas_limit"]
        );
    }

    #[test]
    fn test_amount_parsing() {
        assert_eq!(
            parse_eth_amount("0.005").unwrap(),
            U256::from(5_000_000_000_000_000u64)
        );
        assert_eq!(parse_gwei_amount("1.2").unwrap(), 1_200_000_000);
        assert!(parse_eth_amount("abc").is_err());
    }

    #[test]
    fn test_observability_values_checked() {
        let mut config = AppConfig::default();
        config.observability.log_level = "chatty".to_string();
        config.observability.metrics_address = "localhost".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec!["observability.log_level", "observability.metrics_address"]
        );

        config.observability.log_level = "DEBUG".to_string();
        config.observability.metrics_address = "0.0.0.0:9100".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_bad_price_reported() {
        let mut config = AppConfig::default();
        config.pricing.silver_price_eth = "lots".to_string();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "pricing.silver_price_eth");
    }
}
