//! Chain Reader output types: raw logs and block headers.
//!
//! These are the Chain Reader's boundary types — the shape every RPC
//! adapter must produce, before the Router/Decoders turn them into typed
//! [`crate::types::events::Envelope`]s.

use crate::types::primitives::{BlockNumber, EthAddress, Hash32};

/// A minimal block header: just enough for the Syncer to checkpoint and for
/// decoders to stamp a block timestamp onto an envelope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Block number.
    pub number: BlockNumber,
    /// Block hash.
    pub hash: Hash32,
    /// Unix timestamp (seconds) the block was sealed at.
    pub timestamp: u64,
}

/// A single raw event log as returned by `eth_getLogs`, before routing or
/// decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLog {
    /// Block the log was emitted in.
    pub block_number: BlockNumber,
    /// Hash of the block the log was emitted in.
    pub block_hash: Hash32,
    /// Hash of the transaction that emitted the log.
    pub tx_hash: Hash32,
    /// Index of the transaction within the block.
    pub tx_index: u32,
    /// Index of the log within the block.
    pub log_index: u32,
    /// Address of the contract that emitted the log.
    pub address: EthAddress,
    /// Up to four 32-byte topics; `topics[0]` is the event signature hash
    /// for non-anonymous events.
    pub topics: Vec<Hash32>,
    /// ABI-encoded non-indexed parameter tuple.
    pub data: Vec<u8>,
    /// `true` if this log was emitted by since-orphaned (reorged-out) chain
    /// state. The Chain Reader surfaces these rather than silently
    /// dropping them so callers can apply the §4.6 skip policy themselves.
    pub removed: bool,
}

impl RawLog {
    /// The event signature hash (`topics[0]`), if present.
    #[must_use]
    pub fn signature(&self) -> Option<Hash32> {
        self.topics.first().copied()
    }

    /// The chain-order sort key: `(blockNumber, txIndex, logIndex)`.
    #[must_use]
    pub const fn order_key(&self) -> (u64, u32, u32) {
        (self.block_number.get(), self.tx_index, self.log_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_log(topics: Vec<Hash32>) -> RawLog {
        RawLog {
            block_number: BlockNumber::new(100),
            block_hash: Hash32::ZERO,
            tx_hash: Hash32::ZERO,
            tx_index: 1,
            log_index: 2,
            address: EthAddress::ZERO,
            topics,
            data: vec![],
            removed: false,
        }
    }

    #[test]
    fn signature_is_first_topic() {
        let sig = Hash32::new([0xAB; 32]);
        let log = sample_log(vec![sig]);
        assert_eq!(log.signature(), Some(sig));
    }

    #[test]
    fn signature_is_none_without_topics() {
        let log = sample_log(vec![]);
        assert_eq!(log.signature(), None);
    }

    #[test]
    fn order_key_matches_fields() {
        let log = sample_log(vec![]);
        assert_eq!(log.order_key(), (100, 1, 2));
    }
}
