//! Lootbox opening.

use alloy::primitives::{Address, U256};
use clap::ValueEnum;

use crate::blockchain::contracts::{ContractHandle, ILootbox};
use crate::blockchain::events::extract_event;
use crate::blockchain::transaction::{send_legacy, SubmissionError};
use crate::context::ChainContext;

/// The lootbox tiers the deployment sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LootboxTier {
    Bronze,
    Silver,
}

impl LootboxTier {
    pub fn label(&self) -> &'static str {
        match self {
            LootboxTier::Bronze => "BRONZE",
            LootboxTier::Silver => "SILVER",
        }
    }

    pub fn collection(&self, ctx: &ChainContext) -> Address {
        match self {
            LootboxTier::Bronze => ctx.contracts.bronze_collection,
            LootboxTier::Silver => ctx.contracts.silver_collection,
        }
    }

    pub fn price(&self, ctx: &ChainContext) -> U256 {
        match self {
            LootboxTier::Bronze => ctx.bronze_price,
            LootboxTier::Silver => ctx.silver_price,
        }
    }
}

/// Open one lootbox for `collection`, paying `price` wei.
///
/// Returns the decoded `LootboxOpen` event when the receipt carries one.
pub async fn open(
    ctx: &ChainContext,
    collection: Address,
    price: U256,
) -> Result<Option<ILootbox::LootboxOpen>, SubmissionError> {
    let lootbox = ContractHandle::new(ctx.rpc(), ctx.contracts.lootbox);
    let call = lootbox.pending(&ILootbox::openWithETHCall { collection }, price);
    let receipt = send_legacy(ctx.rpc(), &ctx.fees, call).await?;
    Ok(extract_event::<ILootbox::LootboxOpen>(&receipt))
}

/// Open a lootbox; `true` once the open transaction is confirmed.
pub async fn open_container(
    ctx: &ChainContext,
    collection: Address,
    price: U256,
    label: &str,
) -> bool {
    tracing::info!(
        tier = label,
        collection = %collection,
        price_wei = %price,
        wallet = %ctx.signer(),
        "Opening lootbox"
    );

    match open(ctx, collection, price).await {
        Ok(Some(event)) => {
            let ids: Vec<String> = event.cardTokenIds.iter().map(ToString::to_string).collect();
            tracing::info!(tier = label, token_ids = %ids.join(", "), "Lootbox opened");
            true
        }
        Ok(None) => {
            tracing::warn!(tier = label, "LootboxOpen event not found in receipt");
            true
        }
        Err(e) => {
            tracing::error!(tier = label, reason = %e.reason(), "Failed to open lootbox");
            false
        }
    }
}

/// Open a lootbox of a configured tier.
pub async fn open_tier(ctx: &ChainContext, tier: LootboxTier) -> bool {
    open_container(ctx, tier.collection(ctx), tier.price(ctx), tier.label()).await
}
