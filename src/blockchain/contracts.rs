//! Contract bindings and the per-call handle.
//!
//! The ABI surface is fixed: lootbox, marketplace, the ERC-1155 card
//! collection and the combine contract.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, U256};
use alloy::rpc::types::TransactionRequest;
use alloy::sol;
use alloy::sol_types::SolCall;

use crate::blockchain::rpc::ChainRpc;
use crate::blockchain::types::{BlockchainError, BlockchainResult};

sol! {
    /// Pay-to-open lootbox.
    interface ILootbox {
        function openWithETH(address collection) payable;

        #[derive(Debug, PartialEq, Eq)]
        event LootboxOpen(address indexed opener, address indexed collection, uint256[] cardTokenIds, uint256 timestamp);
    }

    /// Card marketplace.
    interface IMarketplace {
        function buyCard(uint256 listingId) payable;

        #[derive(Debug, PartialEq, Eq)]
        event CardBuy(address indexed buyer, uint256 indexed listingId, address collection, uint256 tokenId, uint256 price, address royaltyRecipient, uint256 royaltyAmount, uint256 timestamp);
    }

    /// ERC-1155 card collection.
    interface IERC1155Items {
        function balanceOf(address account, uint256 id) view returns (uint256);
        function maxId() view returns (uint256);
        function exists(uint256 id) view returns (bool);
        function setApprovalForAll(address operator, bool approved);
        function isApprovedForAll(address account, address operator) view returns (bool);
    }

    /// Burns identical cards into an upgraded one.
    interface ICardCombiner {
        function combineCards(address collection, uint256[] tokenIds);
        function paused() view returns (bool);
    }
}

/// A state-changing call waiting to be priced and submitted.
///
/// Consumed by value by the submitter.
#[derive(Debug)]
pub struct PendingCall {
    pub target: Address,
    /// Solidity signature, e.g. `buyCard(uint256)`. For logs only.
    pub function: &'static str,
    pub input: Bytes,
    pub value: U256,
}

impl PendingCall {
    /// Request shared by gas estimation and submission.
    pub fn to_request(&self, from: Address) -> TransactionRequest {
        TransactionRequest::default()
            .with_from(from)
            .with_to(self.target)
            .with_input(self.input.clone())
            .with_value(self.value)
    }
}

/// A contract address bound to the network handle.
///
/// Cheap to build; façades create one per invocation.
pub struct ContractHandle<'a> {
    rpc: &'a dyn ChainRpc,
    address: Address,
}

impl<'a> ContractHandle<'a> {
    pub fn new(rpc: &'a dyn ChainRpc, address: Address) -> Self {
        Self { rpc, address }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    /// Build the pending state-changing call for `call`.
    pub fn pending<C: SolCall>(&self, call: &C, value: U256) -> PendingCall {
        PendingCall {
            target: self.address,
            function: C::SIGNATURE,
            input: call.abi_encode().into(),
            value,
        }
    }

    /// Execute a view function and decode its return value.
    pub async fn read<C: SolCall>(&self, call: &C) -> BlockchainResult<C::Return> {
        let request = TransactionRequest::default()
            .with_from(self.rpc.signer_address())
            .with_to(self.address)
            .with_input(call.abi_encode());
        let output = self.rpc.call(&request).await?;
        C::abi_decode_returns(&output)
            .map_err(|e| BlockchainError::Decode(format!("{}: {}", C::SIGNATURE, e)))
    }
}
