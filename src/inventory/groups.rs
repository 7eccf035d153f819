//! Combine groups.

use alloy::primitives::U256;

use crate::inventory::TokenRecord;

/// Cards consumed by one combine.
pub const MIN_TOKENS: usize = 2;

/// `MIN_TOKENS` copies of one token id.
///
/// Only [`group_tokens`] builds these, and only from a record holding at
/// least `MIN_TOKENS` copies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CombineGroup {
    token_id: U256,
}

impl CombineGroup {
    pub fn token_id(&self) -> U256 {
        self.token_id
    }

    /// Argument for `combineCards`.
    pub fn ids(&self) -> [U256; MIN_TOKENS] {
        [self.token_id; MIN_TOKENS]
    }
}

/// Records with enough copies to combine at least once.
pub fn combinable(records: &[TokenRecord]) -> Vec<TokenRecord> {
    records
        .iter()
        .filter(|r| r.balance >= U256::from(MIN_TOKENS))
        .copied()
        .collect()
}

/// `floor(balance / MIN_TOKENS)` groups per record, in record order.
pub fn group_tokens(records: &[TokenRecord]) -> Vec<CombineGroup> {
    let mut groups = Vec::new();
    for record in records {
        // Saturates past usize.
        let count: usize = (record.balance / U256::from(MIN_TOKENS)).saturating_to();
        let group = CombineGroup {
            token_id: record.id,
        };
        groups.extend(std::iter::repeat(group).take(count));
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: u64, balance: u64) -> TokenRecord {
        TokenRecord {
            id: U256::from(id),
            balance: U256::from(balance),
        }
    }

    #[test]
    fn test_group_count_is_floor_half() {
        for balance in 0..10u64 {
            let groups = group_tokens(&[record(4, balance)]);
            assert_eq!(groups.len() as u64, balance / 2, "balance {}", balance);
            assert!(groups.iter().all(|g| g.ids() == [U256::from(4); 2]));
        }
    }

    #[test]
    fn test_five_and_one_yields_two_groups_of_three() {
        let records = vec![record(3, 5), record(7, 1)];
        let eligible = combinable(&records);
        assert_eq!(eligible, vec![record(3, 5)]);

        let groups = group_tokens(&eligible);
        assert_eq!(groups.len(), 2);
        for group in &groups {
            assert_eq!(group.ids(), [U256::from(3), U256::from(3)]);
        }
    }

    #[test]
    fn test_groups_keep_record_order() {
        let groups = group_tokens(&[record(9, 2), record(2, 4)]);
        let ids: Vec<u64> = groups.iter().map(|g| g.token_id().to::<u64>()).collect();
        assert_eq!(ids, vec![9, 2, 2]);
    }

    #[test]
    fn test_zero_and_single_balances_filtered() {
        assert!(combinable(&[record(1, 0), record(2, 1)]).is_empty());
        assert!(group_tokens(&[]).is_empty());
    }
}
