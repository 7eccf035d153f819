//! Inventory scanning.
//!
//! The chain is the only source of truth: every scan walks `1..=maxId` again
//! and nothing is cached between runs.

use alloy::primitives::{Address, U256};

use crate::blockchain::contracts::{ContractHandle, IERC1155Items};
use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::inventory::TokenRecord;

/// Reads the signer's holdings in one ERC-1155 collection.
pub struct InventoryScanner<'a> {
    collection: ContractHandle<'a>,
    owner: Address,
}

impl<'a> InventoryScanner<'a> {
    pub fn new(rpc: &'a dyn ChainRpc, collection: Address) -> Self {
        Self {
            owner: rpc.signer_address(),
            collection: ContractHandle::new(rpc, collection),
        }
    }

    /// The collection's declared upper id bound.
    pub async fn max_id(&self) -> BlockchainResult<u64> {
        let max_id = self.collection.read(&IERC1155Items::maxIdCall {}).await?;
        match u64::try_from(max_id) {
            Ok(max_id) => Ok(max_id),
            Err(_) => {
                tracing::warn!(max_id = %max_id, "maxId exceeds u64, clamping");
                Ok(u64::MAX)
            }
        }
    }

    /// Read `maxId` and scan `1..=maxId`.
    ///
    /// Only a failed `maxId` read is an error.
    pub async fn scan(&self) -> BlockchainResult<Vec<TokenRecord>> {
        let max_id = self.max_id().await?;
        tracing::info!(max_id = max_id, collection = %self.collection.address(), "Scanning inventory");
        Ok(self.scan_range(max_id).await)
    }

    /// One record per existing id in `1..=max_id`, zero balances included.
    pub async fn scan_range(&self, max_id: u64) -> Vec<TokenRecord> {
        let mut records = Vec::new();
        for id in 1..=max_id {
            let id = U256::from(id);
            match self.read_record(id).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => tracing::warn!(token_id = %id, error = %e, "Skipping token id"),
            }
        }
        records
    }

    async fn read_record(&self, id: U256) -> Result<Option<TokenRecord>, BlockchainError> {
        if !self.collection.read(&IERC1155Items::existsCall { id }).await? {
            return Ok(None);
        }
        let balance = self
            .collection
            .read(&IERC1155Items::balanceOfCall {
                account: self.owner,
                id,
            })
            .await?;
        Ok(Some(TokenRecord { id, balance }))
    }
}
