//! Batch combine.
//!
//! # Data Flow
//! ```text
//! ensure_authorization
//!     → InventoryScanner::scan (bronze collection)
//!     → combinable + group_tokens
//!     → per group: paused()? → combineCards(collection, [id, id]) → sleep
//! ```
//!
//! # Design Decisions
//! - Groups go out strictly one after another, each awaited to confirmation
//! - A failed group is counted and skipped; a paused combiner ends the run
//! - The inter-group delay applies after failures too

pub mod pipeline;
pub mod state;

pub use pipeline::{combine, run_combine, CombineOutcome, CombinePipeline, CombineReport};
pub use state::{AbortReason, CombineState};
