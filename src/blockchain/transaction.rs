//! Transaction building, broadcasting and confirmation.
//!
//! # Responsibilities
//! - Build legacy (type 0) transactions from a call and its fee quote
//! - Broadcast and block until the receipt arrives
//! - Classify failures as broadcast, confirmation or revert
//!
//! Callers await each submission to completion before issuing the next, so
//! the signer never has two transactions in flight.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, TxHash};
use alloy::rpc::types::TransactionRequest;
use thiserror::Error;

use crate::blockchain::contracts::PendingCall;
use crate::blockchain::fees::FeeEstimator;
use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, FeeQuote, TxReceipt};
use crate::observability::metrics;

/// Why a submission did not produce a successful receipt.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// The node refused the transaction.
    #[error("broadcast rejected: {0}")]
    Broadcast(String),

    /// Broadcast succeeded but no receipt arrived.
    #[error("confirmation failed for {tx_hash}: {reason}")]
    Confirmation { tx_hash: TxHash, reason: String },

    /// Mined with status 0.
    #[error("transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },
}

impl SubmissionError {
    /// Human-readable reason for operator-facing logs.
    pub fn reason(&self) -> String {
        match self {
            SubmissionError::Broadcast(reason) => reason.clone(),
            SubmissionError::Confirmation { reason, .. } => reason.clone(),
            SubmissionError::Reverted { .. } => "execution reverted".to_string(),
        }
    }
}

/// Assemble the signed-to-be legacy transaction.
pub fn build_legacy(
    call: &PendingCall,
    quote: &FeeQuote,
    from: Address,
    chain_id: u64,
) -> TransactionRequest {
    let mut tx = call
        .to_request(from)
        .with_gas_price(quote.gas_price)
        .with_gas_limit(quote.gas_limit)
        .with_chain_id(chain_id);
    tx.transaction_type = Some(0);
    tx
}

/// Broadcasts one transaction and waits for it.
pub struct TxSubmitter<'a> {
    rpc: &'a dyn ChainRpc,
}

impl<'a> TxSubmitter<'a> {
    pub fn new(rpc: &'a dyn ChainRpc) -> Self {
        Self { rpc }
    }

    /// Submit `call` priced by `quote`. Both are consumed.
    pub async fn submit(
        &self,
        call: PendingCall,
        quote: FeeQuote,
    ) -> Result<TxReceipt, SubmissionError> {
        let function = call.function;
        let tx = build_legacy(&call, &quote, self.rpc.signer_address(), self.rpc.chain_id());

        let tx_hash = match self.rpc.send_transaction(tx).await {
            Ok(hash) => hash,
            Err(e) => {
                metrics::record_transaction(function, "rejected");
                return Err(SubmissionError::Broadcast(error_reason(e)));
            }
        };
        tracing::info!(tx_hash = %tx_hash, function = function, "Transaction sent");

        let receipt = match self.rpc.wait_for_receipt(tx_hash).await {
            Ok(receipt) => receipt,
            Err(e) => {
                metrics::record_transaction(function, "unconfirmed");
                return Err(SubmissionError::Confirmation {
                    tx_hash,
                    reason: error_reason(e),
                });
            }
        };

        if !receipt.status {
            metrics::record_transaction(function, "reverted");
            return Err(SubmissionError::Reverted { tx_hash });
        }

        tracing::info!(
            tx_hash = %receipt.tx_hash,
            block_number = receipt.block_number,
            gas_used = receipt.gas_used,
            "Transaction confirmed"
        );
        metrics::record_transaction(function, "confirmed");
        Ok(receipt)
    }
}

/// Quote fresh fees for `call` and submit it.
pub async fn send_legacy(
    rpc: &dyn ChainRpc,
    estimator: &FeeEstimator,
    call: PendingCall,
) -> Result<TxReceipt, SubmissionError> {
    let quote = estimator.quote(rpc, &call).await;
    TxSubmitter::new(rpc).submit(call, quote).await
}

fn error_reason(err: BlockchainError) -> String {
    match err {
        BlockchainError::Rpc(reason) => reason,
        other => other.to_string(),
    }
}
