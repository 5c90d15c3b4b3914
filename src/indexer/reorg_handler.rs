//! Reorg detection: a single-hash comparison checked at the start of every
//! Syncer cycle (§4.7, resolving the spec's open question in favor of the
//! stronger per-cycle guarantee — see DESIGN.md).

use tracing::warn;

use crate::ports::chain::ChainReader;
use crate::types::checkpoint::Checkpoint;
use crate::types::primitives::BlockNumber;

/// The outcome of a reorg check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReorgCheck {
    /// The checkpointed block is still canonical; proceed unchanged.
    Canonical,
    /// The checkpointed block no longer hashes to the checkpointed value; a
    /// reorg has occurred beneath it. Carries the block to rewind to.
    Reorged {
        /// Where to resume: `max(startBlock, checkpointedBlock − confirmations)`.
        rewind_to: BlockNumber,
    },
}

/// Verify the checkpointed head is still on the canonical chain, per
/// §4.7's "Reorg handling" algorithm.
///
/// If `checkpoint.last_block` is still genesis-default (zero hash), there
/// is nothing to compare against yet — treated as canonical.
///
/// # Errors
///
/// Returns an error if the header fetch fails.
pub async fn check<C: ChainReader>(
    chain: &C,
    checkpoint: &Checkpoint,
    start_block: BlockNumber,
    confirmations: u64,
) -> crate::error::Result<ReorgCheck> {
    if checkpoint.last_block_hash.is_zero() {
        return Ok(ReorgCheck::Canonical);
    }

    let header = chain.get_block_header(checkpoint.last_block).await?;
    if header.hash == checkpoint.last_block_hash {
        return Ok(ReorgCheck::Canonical);
    }

    let rewind_to = checkpoint
        .last_block
        .saturating_sub(confirmations)
        .max(start_block);
    warn!(
        checkpointed_block = checkpoint.last_block.get(),
        rewind_to = rewind_to.get(),
        "chain reorg detected beneath checkpoint, rewinding"
    );
    Ok(ReorgCheck::Reorged { rewind_to })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chain::fakes::FakeChainReader;
    use crate::types::primitives::Hash32;
    use crate::types::raw_log::Header;

    fn header(n: u64, hash_byte: u8) -> Header {
        Header {
            number: BlockNumber::new(n),
            hash: Hash32::new([hash_byte; 32]),
            timestamp: 1_700_000_000 + n,
        }
    }

    #[tokio::test]
    async fn fresh_checkpoint_with_zero_hash_is_canonical() {
        let chain = FakeChainReader::new();
        let checkpoint = Checkpoint::fresh("svc", BlockNumber::new(100));
        let result = check(&chain, &checkpoint, BlockNumber::new(100), 10)
            .await
            .unwrap();
        assert_eq!(result, ReorgCheck::Canonical);
    }

    #[tokio::test]
    async fn matching_hash_is_canonical() {
        let chain = FakeChainReader::new();
        chain.set_block(header(100, 0xAB), vec![]);
        let mut checkpoint = Checkpoint::fresh("svc", BlockNumber::new(0));
        checkpoint.last_block = BlockNumber::new(100);
        checkpoint.last_block_hash = Hash32::new([0xAB; 32]);
        let result = check(&chain, &checkpoint, BlockNumber::new(0), 10)
            .await
            .unwrap();
        assert_eq!(result, ReorgCheck::Canonical);
    }

    #[tokio::test]
    async fn mismatched_hash_rewinds_by_confirmations() {
        let chain = FakeChainReader::new();
        chain.set_block(header(100, 0xCD), vec![]); // canonical hash differs from checkpoint
        let mut checkpoint = Checkpoint::fresh("svc", BlockNumber::new(0));
        checkpoint.last_block = BlockNumber::new(100);
        checkpoint.last_block_hash = Hash32::new([0xAB; 32]);
        let result = check(&chain, &checkpoint, BlockNumber::new(0), 10)
            .await
            .unwrap();
        assert_eq!(
            result,
            ReorgCheck::Reorged {
                rewind_to: BlockNumber::new(90)
            }
        );
    }

    #[tokio::test]
    async fn rewind_never_goes_below_start_block() {
        let chain = FakeChainReader::new();
        chain.set_block(header(15, 0xCD), vec![]);
        let mut checkpoint = Checkpoint::fresh("svc", BlockNumber::new(0));
        checkpoint.last_block = BlockNumber::new(15);
        checkpoint.last_block_hash = Hash32::new([0xAB; 32]);
        let result = check(&chain, &checkpoint, BlockNumber::new(10), 100)
            .await
            .unwrap();
        assert_eq!(
            result,
            ReorgCheck::Reorged {
                rewind_to: BlockNumber::new(10)
            }
        );
    }
}
