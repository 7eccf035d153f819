//! Event extraction from confirmed receipts.

use alloy::sol_types::SolEvent;

use crate::blockchain::types::TxReceipt;

/// First `E` emitted in `receipt`, decoded.
///
/// Logs are scanned in emitted order and matched on topic0. A matching log
/// that does not decode is logged and skipped. `None` is not an error: the
/// transaction itself already succeeded.
pub fn extract_event<E: SolEvent>(receipt: &TxReceipt) -> Option<E> {
    for (index, log) in receipt.logs.iter().enumerate() {
        if log.topics().first() != Some(&E::SIGNATURE_HASH) {
            continue;
        }
        match E::decode_log_data(&log.data) {
            Ok(event) => return Some(event),
            Err(e) => {
                tracing::warn!(
                    tx_hash = %receipt.tx_hash,
                    log_index = index,
                    event = E::SIGNATURE,
                    error = %e,
                    "Matching log failed to decode"
                );
            }
        }
    }
    None
}
