//! Marketplace purchase.

use alloy::primitives::U256;

use crate::blockchain::contracts::{ContractHandle, IMarketplace};
use crate::blockchain::events::extract_event;
use crate::blockchain::transaction::{send_legacy, SubmissionError};
use crate::context::ChainContext;

/// Buy listing `listing_id` for `price` wei.
///
/// Returns the decoded `CardBuy` event when the receipt carries one.
pub async fn purchase(
    ctx: &ChainContext,
    listing_id: U256,
    price: U256,
) -> Result<Option<IMarketplace::CardBuy>, SubmissionError> {
    let marketplace = ContractHandle::new(ctx.rpc(), ctx.contracts.marketplace);
    let call = marketplace.pending(
        &IMarketplace::buyCardCall {
            listingId: listing_id,
        },
        price,
    );
    let receipt = send_legacy(ctx.rpc(), &ctx.fees, call).await?;
    Ok(extract_event::<IMarketplace::CardBuy>(&receipt))
}

/// Buy a card; `true` once the purchase transaction is confirmed.
pub async fn buy_card(ctx: &ChainContext, listing_id: U256, price: U256) -> bool {
    tracing::info!(
        listing_id = %listing_id,
        price_wei = %price,
        wallet = %ctx.signer(),
        "Buying card"
    );

    match purchase(ctx, listing_id, price).await {
        Ok(Some(event)) => {
            tracing::info!(
                token_id = %event.tokenId,
                collection = %event.collection,
                "Card bought"
            );
            true
        }
        Ok(None) => {
            tracing::warn!("CardBuy event not found in receipt");
            true
        }
        Err(e) => {
            tracing::error!(reason = %e.reason(), "Failed to buy card");
            false
        }
    }
}
