//! Lootbox / marketplace / combine automation for one signer on one EVM network.

pub mod blockchain;
pub mod combine;
pub mod config;
pub mod context;
pub mod inventory;
pub mod observability;
pub mod operations;

pub use combine::{combine, run_combine, CombineReport};
pub use config::AppConfig;
pub use context::ChainContext;
pub use operations::{buy_card, ensure_authorization, full_cycle, open_container, open_tier};
