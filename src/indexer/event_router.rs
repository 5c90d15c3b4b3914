//! Event router: dispatches a raw log to its decoder by signature hash.
//!
//! The [`Router`] holds an immutable, read-only-after-construction mapping
//! from `topics[0]` to a decoder function. It never mutates and may be
//! shared freely across worker tasks behind an `Arc` (§4.3).

use alloy::sol_types::SolEvent;
use tracing::{debug, instrument};

use crate::abi::{conditional_tokens, exchange};
use crate::error::Result;
use crate::indexer::decode;
use crate::types::events::Envelope;
use crate::types::primitives::Hash32;
use crate::types::raw_log::RawLog;

type Decoder = fn(&RawLog) -> Result<crate::types::events::Payload>;

/// Maps event-signature hashes to `(eventName, decoder)`, per §4.3.
///
/// Built once at startup via [`Router::new`] from the fixed event
/// registry; immutable and safe to share across the Backfill worker pool.
#[derive(Debug, Clone, Copy)]
pub struct Router;

impl Router {
    /// Construct the router. Registration happens at compile time — the
    /// fixed event catalogue is the same for every instance.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn lookup(signature: Hash32) -> Option<(&'static str, Decoder)> {
        let sig = signature.as_bytes();
        Some(match sig {
            s if *s == *exchange::OrderFilled::SIGNATURE_HASH => {
                ("OrderFilled", decode::order_filled as Decoder)
            }
            s if *s == *exchange::OrderCancelled::SIGNATURE_HASH => {
                ("OrderCancelled", decode::order_cancelled as Decoder)
            }
            s if *s == *exchange::TokenRegistered::SIGNATURE_HASH => {
                ("TokenRegistered", decode::token_registered as Decoder)
            }
            s if *s == *conditional_tokens::TransferSingle::SIGNATURE_HASH => {
                ("TransferSingle", decode::transfer_single as Decoder)
            }
            s if *s == *conditional_tokens::TransferBatch::SIGNATURE_HASH => {
                ("TransferBatch", decode::transfer_batch as Decoder)
            }
            s if *s == *conditional_tokens::ConditionPreparation::SIGNATURE_HASH => (
                "ConditionPreparation",
                decode::condition_preparation as Decoder,
            ),
            s if *s == *conditional_tokens::ConditionResolution::SIGNATURE_HASH => (
                "ConditionResolution",
                decode::condition_resolution as Decoder,
            ),
            s if *s == *conditional_tokens::PositionSplit::SIGNATURE_HASH => {
                ("PositionSplit", decode::position_split as Decoder)
            }
            s if *s == *conditional_tokens::PositionsMerge::SIGNATURE_HASH => {
                ("PositionsMerge", decode::positions_merge as Decoder)
            }
            _ => return None,
        })
    }

    /// Route a single raw log, decoding it into an [`Envelope`] if its
    /// `topics[0]` matches a registered signature.
    ///
    /// Returns `Ok(None)` for an empty-topics log or an unregistered
    /// signature — the Processor treats this as "uninteresting, skip
    /// silently" (§4.3), not an error.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AppError::DecodeError`] if the signature is
    /// registered but the log's shape doesn't match (wrong topic count,
    /// malformed ABI-encoded data).
    #[instrument(skip(self, log), fields(tx_hash = %log.tx_hash, log_index = log.log_index))]
    pub fn route(&self, log: &RawLog, block_timestamp: u64) -> Result<Option<Envelope>> {
        let Some(signature) = log.signature() else {
            debug!("skipping log with no topics");
            return Ok(None);
        };

        let Some((event_name, decoder)) = Self::lookup(signature) else {
            debug!(signature = %signature, "no handler registered for signature");
            return Ok(None);
        };

        let payload = decoder(log)?;
        Ok(Some(Envelope {
            block_number: log.block_number,
            block_hash: log.block_hash,
            tx_hash: log.tx_hash,
            tx_index: log.tx_index,
            log_index: log.log_index,
            contract: log.address,
            event_name: event_name.to_string(),
            event_sig: signature,
            block_timestamp,
            success: !log.removed,
            payload,
        }))
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
