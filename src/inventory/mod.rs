//! Inventory subsystem.
//!
//! # Data Flow
//! ```text
//! scanner.rs: maxId → exists(id) → balanceOf(signer, id) → Vec<TokenRecord>
//! groups.rs:  records with balance ≥ 2 → floor(balance / 2) × CombineGroup
//! ```

pub mod groups;
pub mod scanner;

use alloy::primitives::U256;

pub use groups::{combinable, group_tokens, CombineGroup, MIN_TOKENS};
pub use scanner::InventoryScanner;

/// Owned quantity of one existing token id at scan time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenRecord {
    pub id: U256,
    pub balance: U256,
}
