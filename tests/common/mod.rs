//! Shared in-memory chain for integration tests.

#![allow(dead_code)]

use alloy::primitives::{Address, Bytes, Log, LogData, TxHash, B256, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol_types::{SolCall, SolValue};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use lootbox_combiner::blockchain::contracts::{ICardCombiner, IERC1155Items};
use lootbox_combiner::blockchain::{
    BlockchainError, BlockchainResult, ChainRpc, FeeData, FeeEstimator, TxReceipt,
};
use lootbox_combiner::config::ContractsConfig;
use lootbox_combiner::ChainContext;

pub const CHAIN_ID: u64 = 20994;

/// Programmable node state.
pub struct MockState {
    pub gas_price: Result<u128, String>,
    pub fee_data: Result<FeeData, String>,
    pub gas_estimate: Result<u64, String>,
    pub estimate_calls: usize,

    pub max_id: Result<U256, String>,
    pub existing: HashSet<u64>,
    pub balances: HashMap<u64, u64>,
    /// Ids whose `exists` read errors.
    pub failing_ids: HashSet<u64>,
    /// Ids whose `balanceOf` read errors.
    pub failing_balance_ids: HashSet<u64>,

    pub approved: bool,
    pub approval_read_fails: bool,

    /// Pause reads from this zero-based read onwards return true.
    pub paused_from: Option<usize>,
    pub pause_read_fails: bool,
    pub pause_reads: usize,

    /// Zero-based send attempts the node rejects.
    pub rejected_sends: HashSet<usize>,
    /// Zero-based send attempts that mine with status 0.
    pub reverted_sends: HashSet<usize>,
    /// Zero-based send attempts that are accepted but never mined.
    pub unconfirmed_sends: HashSet<usize>,
    /// Logs attached to receipts, by function selector.
    pub logs_by_selector: HashMap<[u8; 4], Vec<LogData>>,

    pub sent: Vec<TransactionRequest>,
    pub receipts: HashMap<TxHash, TxReceipt>,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            gas_price: Ok(2_000_000_000),
            fee_data: Ok(FeeData {
                base_fee_per_gas: Some(2_500_000_000),
                max_priority_fee_per_gas: Some(500_000_000),
            }),
            gas_estimate: Ok(100_000),
            estimate_calls: 0,
            max_id: Ok(U256::ZERO),
            existing: HashSet::new(),
            balances: HashMap::new(),
            failing_ids: HashSet::new(),
            failing_balance_ids: HashSet::new(),
            approved: true,
            approval_read_fails: false,
            paused_from: None,
            pause_read_fails: false,
            pause_reads: 0,
            rejected_sends: HashSet::new(),
            reverted_sends: HashSet::new(),
            unconfirmed_sends: HashSet::new(),
            logs_by_selector: HashMap::new(),
            sent: Vec::new(),
            receipts: HashMap::new(),
        }
    }
}

pub struct MockChain {
    signer: Address,
    pub state: Mutex<MockState>,
}

impl MockChain {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            signer: Address::repeat_byte(0x5e),
            state: Mutex::new(MockState::default()),
        })
    }

    /// Give the signer `balance` of each listed id and set `maxId`.
    pub fn with_inventory(self: Arc<Self>, max_id: u64, holdings: &[(u64, u64)]) -> Arc<Self> {
        {
            let mut state = self.state.lock().unwrap();
            state.max_id = Ok(U256::from(max_id));
            for (id, balance) in holdings {
                state.existing.insert(*id);
                state.balances.insert(*id, *balance);
            }
        }
        self
    }

    pub fn update(&self, f: impl FnOnce(&mut MockState)) {
        f(&mut self.state.lock().unwrap());
    }

    pub fn sent(&self) -> Vec<TransactionRequest> {
        self.state.lock().unwrap().sent.clone()
    }

    /// Transactions whose call data starts with `selector`.
    pub fn sent_with(&self, selector: [u8; 4]) -> Vec<TransactionRequest> {
        self.sent()
            .into_iter()
            .filter(|tx| selector_of(tx) == Some(selector))
            .collect()
    }

    /// Token id lists of every `combineCards` sent.
    pub fn combined_groups(&self) -> Vec<Vec<U256>> {
        self.sent_with(ICardCombiner::combineCardsCall::SELECTOR)
            .iter()
            .map(|tx| {
                let input = tx.input.input().cloned().unwrap_or_default();
                ICardCombiner::combineCardsCall::abi_decode(&input)
                    .unwrap()
                    .tokenIds
            })
            .collect()
    }

    pub fn pause_reads(&self) -> usize {
        self.state.lock().unwrap().pause_reads
    }
}

fn selector_of(tx: &TransactionRequest) -> Option<[u8; 4]> {
    let input = tx.input.input()?;
    input.get(..4)?.try_into().ok()
}

fn rpc_err(message: &str) -> BlockchainError {
    BlockchainError::Rpc(message.to_string())
}

#[async_trait]
impl ChainRpc for MockChain {
    fn signer_address(&self) -> Address {
        self.signer
    }

    fn chain_id(&self) -> u64 {
        CHAIN_ID
    }

    async fn gas_price(&self) -> BlockchainResult<u128> {
        self.state.lock().unwrap().gas_price.clone().map_err(|e| rpc_err(&e))
    }

    async fn fee_data(&self) -> BlockchainResult<FeeData> {
        self.state.lock().unwrap().fee_data.clone().map_err(|e| rpc_err(&e))
    }

    async fn estimate_gas(&self, _tx: &TransactionRequest) -> BlockchainResult<u64> {
        let mut state = self.state.lock().unwrap();
        state.estimate_calls += 1;
        state.gas_estimate.clone().map_err(|e| rpc_err(&e))
    }

    async fn call(&self, tx: &TransactionRequest) -> BlockchainResult<Bytes> {
        let mut state = self.state.lock().unwrap();
        let input = tx.input.input().cloned().unwrap_or_default();
        let selector = selector_of(tx).ok_or_else(|| rpc_err("empty call data"))?;

        let output = match selector {
            IERC1155Items::maxIdCall::SELECTOR => {
                state.max_id.clone().map_err(|e| rpc_err(&e))?.abi_encode()
            }
            IERC1155Items::existsCall::SELECTOR => {
                let call = IERC1155Items::existsCall::abi_decode(&input)
                    .map_err(|e| rpc_err(&e.to_string()))?;
                let id: u64 = call.id.to();
                if state.failing_ids.contains(&id) {
                    return Err(rpc_err("header not found"));
                }
                state.existing.contains(&id).abi_encode()
            }
            IERC1155Items::balanceOfCall::SELECTOR => {
                let call = IERC1155Items::balanceOfCall::abi_decode(&input)
                    .map_err(|e| rpc_err(&e.to_string()))?;
                assert_eq!(call.account, self.signer);
                let id: u64 = call.id.to();
                if state.failing_balance_ids.contains(&id) {
                    return Err(rpc_err("header not found"));
                }
                U256::from(state.balances.get(&id).copied().unwrap_or(0)).abi_encode()
            }
            IERC1155Items::isApprovedForAllCall::SELECTOR => {
                if state.approval_read_fails {
                    return Err(rpc_err("isApprovedForAll unavailable"));
                }
                state.approved.abi_encode()
            }
            ICardCombiner::pausedCall::SELECTOR => {
                let read = state.pause_reads;
                state.pause_reads += 1;
                if state.pause_read_fails {
                    return Err(rpc_err("paused() unavailable"));
                }
                state.paused_from.is_some_and(|from| read >= from).abi_encode()
            }
            other => return Err(rpc_err(&format!("unexpected call {:?}", other))),
        };
        Ok(output.into())
    }

    async fn send_transaction(&self, tx: TransactionRequest) -> BlockchainResult<TxHash> {
        let mut state = self.state.lock().unwrap();
        let index = state.sent.len();
        let selector = selector_of(&tx);
        state.sent.push(tx);

        if state.rejected_sends.contains(&index) {
            return Err(rpc_err("insufficient funds for gas * price + value"));
        }

        let tx_hash = B256::from(U256::from(index + 1));
        if state.unconfirmed_sends.contains(&index) {
            return Ok(tx_hash);
        }

        let status = !state.reverted_sends.contains(&index);
        if status && selector == Some(IERC1155Items::setApprovalForAllCall::SELECTOR) {
            state.approved = true;
        }

        let logs = selector
            .and_then(|s| state.logs_by_selector.get(&s).cloned())
            .unwrap_or_default()
            .into_iter()
            .map(|data| Log {
                address: Address::repeat_byte(0xcc),
                data,
            })
            .collect();
        state.receipts.insert(
            tx_hash,
            TxReceipt {
                tx_hash,
                block_number: Some(100 + index as u64),
                gas_used: 50_000,
                status,
                logs,
            },
        );
        Ok(tx_hash)
    }

    async fn wait_for_receipt(&self, tx_hash: TxHash) -> BlockchainResult<TxReceipt> {
        self.state
            .lock()
            .unwrap()
            .receipts
            .get(&tx_hash)
            .cloned()
            .ok_or(BlockchainError::ConfirmationTimeout(tx_hash))
    }
}

pub fn contracts() -> ContractsConfig {
    ContractsConfig {
        lootbox: Address::repeat_byte(0x01),
        marketplace: Address::repeat_byte(0x02),
        combiner: Address::repeat_byte(0x03),
        bronze_collection: Address::repeat_byte(0x04),
        silver_collection: Address::repeat_byte(0x05),
    }
}

/// Context over `mock` with the production delays.
pub fn context(mock: &Arc<MockChain>) -> ChainContext {
    ChainContext {
        rpc: mock.clone(),
        contracts: contracts(),
        fees: FeeEstimator::default(),
        bronze_price: U256::from(5_000_000_000_000_000u64),
        silver_price: U256::from(85_000_000_000_000_000u64),
        inter_group_delay: Duration::from_secs(15),
        cycle_settle_delay: Duration::from_secs(10),
    }
}

/// Context over `mock` without waiting between submissions.
pub fn fast_context(mock: &Arc<MockChain>) -> ChainContext {
    let mut ctx = context(mock);
    ctx.inter_group_delay = Duration::ZERO;
    ctx.cycle_settle_delay = Duration::ZERO;
    ctx
}
