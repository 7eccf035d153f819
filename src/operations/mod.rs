//! Caller-facing operations.
//!
//! Every operation builds its contract handle, submits through
//! `send_legacy`, decodes the expected event where there is one, and reports
//! a plain `bool`. Failures end here as log lines; nothing is propagated.

pub mod approval;
pub mod buy;
pub mod cycle;
pub mod lootbox;

pub use approval::ensure_authorization;
pub use buy::buy_card;
pub use cycle::{full_cycle, Acquisition};
pub use lootbox::{open_container, open_tier, LootboxTier};
