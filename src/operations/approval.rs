//! Operator approval for the combine contract.

use crate::blockchain::contracts::{ContractHandle, IERC1155Items};
use crate::blockchain::transaction::send_legacy;
use crate::context::ChainContext;

/// Make sure the combiner may move the signer's bronze cards.
///
/// Sends nothing when the approval is already in place.
pub async fn ensure_authorization(ctx: &ChainContext) -> bool {
    let collection = ContractHandle::new(ctx.rpc(), ctx.contracts.bronze_collection);
    let operator = ctx.contracts.combiner;
    tracing::info!(
        wallet = %ctx.signer(),
        operator = %operator,
        collection = %collection.address(),
        "Checking combiner approval"
    );

    let check = IERC1155Items::isApprovedForAllCall {
        account: ctx.signer(),
        operator,
    };
    match collection.read(&check).await {
        Ok(true) => {
            tracing::info!(operator = %operator, "Approval already set");
            return true;
        }
        Ok(false) => {
            tracing::info!(operator = %operator, "Approval not granted yet, setting it");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not read approval state, setting it anyway");
        }
    }

    let call = collection.pending(
        &IERC1155Items::setApprovalForAllCall {
            operator,
            approved: true,
        },
        Default::default(),
    );
    match send_legacy(ctx.rpc(), &ctx.fees, call).await {
        Ok(_) => {
            tracing::info!(operator = %operator, "Approval set");
            true
        }
        Err(e) => {
            tracing::error!(reason = %e.reason(), "Failed to set approval");
            false
        }
    }
}
