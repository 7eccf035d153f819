//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AppConfig (validated, immutable)
//!     → context.rs builds the ChainContext from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults matching the Fluent testnet deployment
//! - The signer key never lives in the config file; it comes from `PRIVATE_KEY`

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AppConfig, CombineConfig, ContractsConfig, FeeConfig, NetworkConfig, ObservabilityConfig,
    PricingConfig,
};
