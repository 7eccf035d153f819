//! Combine pipeline states.
//!
//! # State Transitions
//! ```text
//! Idle → Authorizing → Scanning → Grouping → Submitting(0) → … → Submitting(n-1) → Done
//!
//! Authorizing → Aborted(Unauthorized):      approval could not be ensured
//! Scanning    → Aborted(ScanFailed):        maxId unreadable
//! Scanning    → Aborted(NothingToCombine):  no id held twice
//! Grouping    → Aborted(NothingToCombine):  no groups formed
//! Submitting  → Aborted(Paused):            combiner paused before a group
//! ```

use serde::Serialize;
use std::collections::VecDeque;

use crate::inventory::{combinable, group_tokens, CombineGroup, TokenRecord};

/// Why a run stopped before `Done`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum AbortReason {
    Unauthorized,
    ScanFailed { error: String },
    NothingToCombine,
    /// Groups left unsubmitted when the pause was seen.
    Paused { remaining: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CombineState {
    Idle,
    Authorizing,
    Scanning,
    Grouping(Vec<TokenRecord>),
    Submitting {
        /// Zero-based position of the next group.
        index: usize,
        remaining: VecDeque<CombineGroup>,
    },
    Done,
    Aborted(AbortReason),
}

impl CombineState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, CombineState::Done | CombineState::Aborted(_))
    }

    pub fn name(&self) -> &'static str {
        match self {
            CombineState::Idle => "idle",
            CombineState::Authorizing => "authorizing",
            CombineState::Scanning => "scanning",
            CombineState::Grouping(_) => "grouping",
            CombineState::Submitting { .. } => "submitting",
            CombineState::Done => "done",
            CombineState::Aborted(_) => "aborted",
        }
    }
}

/// Scanning → Grouping, or abort when nothing qualifies.
pub fn after_scan(records: &[TokenRecord]) -> CombineState {
    let eligible = combinable(records);
    if eligible.is_empty() {
        CombineState::Aborted(AbortReason::NothingToCombine)
    } else {
        CombineState::Grouping(eligible)
    }
}

/// Grouping → Submitting(0), or abort when no group forms.
pub fn after_grouping(records: &[TokenRecord]) -> CombineState {
    let groups = group_tokens(records);
    if groups.is_empty() {
        CombineState::Aborted(AbortReason::NothingToCombine)
    } else {
        CombineState::Submitting {
            index: 0,
            remaining: groups.into(),
        }
    }
}

/// Next state once the group at `index` has been handled.
pub fn after_group(index: usize, remaining: VecDeque<CombineGroup>) -> CombineState {
    if remaining.is_empty() {
        CombineState::Done
    } else {
        CombineState::Submitting {
            index: index + 1,
            remaining,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::U256;

    fn record(id: u64, balance: u64) -> TokenRecord {
        TokenRecord {
            id: U256::from(id),
            balance: U256::from(balance),
        }
    }

    #[test]
    fn test_scan_with_no_pairs_aborts() {
        let state = after_scan(&[record(1, 1), record(2, 0)]);
        assert_eq!(state, CombineState::Aborted(AbortReason::NothingToCombine));
        assert!(state.is_terminal());
    }

    #[test]
    fn test_scan_keeps_only_pairs() {
        let state = after_scan(&[record(3, 5), record(7, 1)]);
        assert_eq!(state, CombineState::Grouping(vec![record(3, 5)]));
    }

    #[test]
    fn test_grouping_enters_first_submission() {
        match after_grouping(&[record(3, 5)]) {
            CombineState::Submitting { index, remaining } => {
                assert_eq!(index, 0);
                assert_eq!(remaining.len(), 2);
            }
            other => panic!("unexpected state {:?}", other),
        }
    }

    #[test]
    fn test_grouping_without_groups_aborts() {
        assert_eq!(
            after_grouping(&[]),
            CombineState::Aborted(AbortReason::NothingToCombine)
        );
    }

    #[test]
    fn test_last_group_finishes() {
        assert_eq!(after_group(4, VecDeque::new()), CombineState::Done);
    }

    #[test]
    fn test_abort_reason_serializes_tagged() {
        let json = serde_json::to_value(AbortReason::Paused { remaining: 3 }).unwrap();
        assert_eq!(json["reason"], "paused");
        assert_eq!(json["remaining"], 3);
    }
}
