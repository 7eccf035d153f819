//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! PRIVATE_KEY env var
//!     → wallet.rs (signer identity)
//!     → client.rs (alloy providers, timeouts, failover) implements rpc.rs
//!
//! Façade / pipeline
//!     → contracts.rs (sol! bindings, ContractHandle → PendingCall)
//!     → fees.rs (gas price chain + gas limit → FeeQuote)
//!     → transaction.rs (legacy tx, broadcast, wait → TxReceipt)
//!     → events.rs (first matching log → decoded event)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod contracts;
pub mod events;
pub mod fees;
pub mod rpc;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use contracts::{ContractHandle, PendingCall};
pub use events::extract_event;
pub use fees::FeeEstimator;
pub use rpc::ChainRpc;
pub use transaction::{send_legacy, SubmissionError, TxSubmitter};
pub use types::{BlockchainError, BlockchainResult, ChainId, FeeData, FeeQuote, TxReceipt};
pub use wallet::Wallet;
