//! Batch combine pipeline.

use serde::Serialize;
use std::collections::VecDeque;

use crate::blockchain::contracts::{ContractHandle, ICardCombiner};
use crate::blockchain::transaction::send_legacy;
use crate::combine::state::{after_group, after_grouping, after_scan, AbortReason, CombineState};
use crate::context::ChainContext;
use crate::inventory::{CombineGroup, InventoryScanner};
use crate::observability::metrics;
use crate::operations::approval::ensure_authorization;

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CombineOutcome {
    Done,
    Aborted(AbortReason),
}

/// Summary of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CombineReport {
    /// Groups formed from the scan.
    pub groups: usize,
    /// Groups whose combine transaction confirmed.
    pub submitted: usize,
    /// Groups whose combine transaction failed.
    pub failed: usize,
    pub outcome: CombineOutcome,
}

impl CombineReport {
    pub fn success(&self) -> bool {
        self.outcome == CombineOutcome::Done
    }
}

/// Drives one combine run through [`CombineState`].
pub struct CombinePipeline<'a> {
    ctx: &'a ChainContext,
    state: CombineState,
    groups: usize,
    submitted: usize,
    failed: usize,
}

impl<'a> CombinePipeline<'a> {
    pub fn new(ctx: &'a ChainContext) -> Self {
        Self {
            ctx,
            state: CombineState::Idle,
            groups: 0,
            submitted: 0,
            failed: 0,
        }
    }

    pub fn state(&self) -> &CombineState {
        &self.state
    }

    /// Perform one transition. No-op once terminal.
    pub async fn step(&mut self) {
        let current = std::mem::replace(&mut self.state, CombineState::Idle);
        let next = match current {
            CombineState::Idle => CombineState::Authorizing,
            CombineState::Authorizing => self.authorize().await,
            CombineState::Scanning => self.scan().await,
            CombineState::Grouping(records) => {
                let next = after_grouping(&records);
                if let CombineState::Submitting { remaining, .. } = &next {
                    self.groups = remaining.len();
                    tracing::info!(groups = self.groups, "Found groups to combine");
                }
                next
            }
            CombineState::Submitting {
                index,
                mut remaining,
            } => match remaining.pop_front() {
                Some(group) => self.submit(index, group, remaining).await,
                None => CombineState::Done,
            },
            terminal @ (CombineState::Done | CombineState::Aborted(_)) => terminal,
        };

        tracing::debug!(state = next.name(), "Combine pipeline transition");
        self.state = next;
    }

    /// Step until `Done` or `Aborted`.
    pub async fn run(mut self) -> CombineReport {
        while !self.state.is_terminal() {
            self.step().await;
        }
        self.report()
    }

    pub fn report(&self) -> CombineReport {
        let outcome = match &self.state {
            CombineState::Aborted(reason) => CombineOutcome::Aborted(reason.clone()),
            _ => CombineOutcome::Done,
        };
        CombineReport {
            groups: self.groups,
            submitted: self.submitted,
            failed: self.failed,
            outcome,
        }
    }

    async fn authorize(&self) -> CombineState {
        tracing::info!("Ensuring approval for the combiner");
        if ensure_authorization(self.ctx).await {
            CombineState::Scanning
        } else {
            tracing::error!("Stopping: approval could not be set");
            CombineState::Aborted(AbortReason::Unauthorized)
        }
    }

    async fn scan(&self) -> CombineState {
        let scanner = InventoryScanner::new(self.ctx.rpc(), self.ctx.contracts.bronze_collection);
        let records = match scanner.scan().await {
            Ok(records) => records,
            Err(e) => {
                tracing::error!(error = %e, "Inventory scan failed");
                return CombineState::Aborted(AbortReason::ScanFailed {
                    error: e.to_string(),
                });
            }
        };

        for record in records.iter().filter(|r| !r.balance.is_zero()) {
            tracing::info!(token_id = %record.id, balance = %record.balance, "Owned token");
        }

        let next = after_scan(&records);
        if matches!(next, CombineState::Aborted(_)) {
            tracing::warn!("No token id is held at least twice, nothing to combine");
        }
        next
    }

    async fn submit(
        &mut self,
        index: usize,
        group: CombineGroup,
        remaining: VecDeque<CombineGroup>,
    ) -> CombineState {
        let combiner = ContractHandle::new(self.ctx.rpc(), self.ctx.contracts.combiner);
        tracing::info!(
            group = index + 1,
            of = self.groups,
            token_id = %group.token_id(),
            "Combining tokens"
        );

        match combiner.read(&ICardCombiner::pausedCall {}).await {
            Ok(true) => {
                let left = remaining.len() + 1;
                tracing::error!(remaining = left, "Combiner is paused, stopping");
                metrics::record_combine_group("paused");
                return CombineState::Aborted(AbortReason::Paused { remaining: left });
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Could not read pause flag, continuing"),
        }

        let call = combiner.pending(
            &ICardCombiner::combineCardsCall {
                collection: self.ctx.contracts.bronze_collection,
                tokenIds: group.ids().to_vec(),
            },
            Default::default(),
        );
        match send_legacy(self.ctx.rpc(), &self.ctx.fees, call).await {
            Ok(_) => {
                self.submitted += 1;
                metrics::record_combine_group("confirmed");
                tracing::info!(token_id = %group.token_id(), "Combine succeeded");
            }
            Err(e) => {
                self.failed += 1;
                metrics::record_combine_group("failed");
                tracing::error!(token_id = %group.token_id(), reason = %e.reason(), "Combine failed");
            }
        }

        tracing::info!(
            delay_secs = self.ctx.inter_group_delay.as_secs(),
            "Waiting before the next transaction"
        );
        tokio::time::sleep(self.ctx.inter_group_delay).await;

        after_group(index, remaining)
    }
}

/// Run the whole pipeline and return its report.
pub async fn run_combine(ctx: &ChainContext) -> CombineReport {
    tracing::info!(wallet = %ctx.signer(), "Starting combine");
    let report = CombinePipeline::new(ctx).run().await;
    tracing::info!(
        groups = report.groups,
        submitted = report.submitted,
        failed = report.failed,
        success = report.success(),
        "Combine finished"
    );
    report
}

/// Caller-facing combine: `true` when every group was attempted.
pub async fn combine(ctx: &ChainContext) -> bool {
    run_combine(ctx).await.success()
}
