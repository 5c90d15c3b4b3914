//! The Checkpoint entity — one record per monitored service.

use chrono::{DateTime, Utc};

use crate::types::primitives::{BlockNumber, Hash32};

/// Exactly one record per `serviceName`: the last safely processed block and
/// its hash, used for crash recovery and reorg detection (§3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Checkpoint {
    /// The service this checkpoint belongs to (the primary key).
    pub service_name: String,
    /// Last block whose logs were fully handed to the Publisher.
    pub last_block: BlockNumber,
    /// Hash of `last_block`, used to detect a reorg beneath the checkpoint.
    /// Zero until the first successful update.
    pub last_block_hash: Hash32,
    /// When this record was last written.
    pub updated_at: DateTime<Utc>,
}

impl Checkpoint {
    /// Construct the checkpoint a fresh deployment starts with: `lastBlock =
    /// defaultStartBlock`, `lastBlockHash = zero`.
    #[must_use]
    pub fn fresh(service_name: impl Into<String>, default_start_block: BlockNumber) -> Self {
        Self {
            service_name: service_name.into(),
            last_block: default_start_block,
            last_block_hash: Hash32::ZERO,
            updated_at: Utc::now(),
        }
    }
}
