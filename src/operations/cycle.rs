//! Acquire-then-combine cycle.

use alloy::primitives::U256;

use crate::combine::combine;
use crate::context::ChainContext;
use crate::operations::buy::buy_card;
use crate::operations::lootbox::{open_tier, LootboxTier};

/// How the cycle gets its new card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Acquisition {
    Buy { listing_id: U256, price: U256 },
    Open(LootboxTier),
}

/// Acquire a card, let the chain settle, then run the combine pipeline.
///
/// A failed acquisition is logged and the combine still runs over whatever
/// the wallet already holds. The result is the combine's.
pub async fn full_cycle(ctx: &ChainContext, acquisition: Acquisition) -> bool {
    let acquired = match acquisition {
        Acquisition::Buy { listing_id, price } => buy_card(ctx, listing_id, price).await,
        Acquisition::Open(tier) => open_tier(ctx, tier).await,
    };
    if !acquired {
        tracing::warn!("Acquisition failed, combining existing inventory");
    }

    tracing::info!(
        delay_secs = ctx.cycle_settle_delay.as_secs(),
        "Waiting before combine"
    );
    tokio::time::sleep(ctx.cycle_settle_delay).await;

    combine(ctx).await
}
