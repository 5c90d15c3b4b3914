//! Batch Processor: fetch → route → publish for one block or range (§4.6).
//!
//! `ProcessBlockRange` is the Backfill path's unit of work; `ProcessBlock`
//! is the Realtime path's. Both share the same fetch/route/publish core —
//! `ProcessBlock` is simply `ProcessBlockRange(n, n)`.

use tracing::{debug, instrument, warn};

use crate::error::{AppError, Result};
use crate::indexer::event_router::Router;
use crate::indexer::retry::{retry, RetryPolicy};
use crate::ports::chain::ChainReader;
use crate::ports::streaming::Publisher;
use crate::types::primitives::{BlockNumber, EthAddress};
use crate::types::raw_log::Header;

/// Orchestrates fetch → route → publish for a contiguous block range.
///
/// Holds no mutable state of its own; safe to share across the Backfill
/// worker pool behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Processor<C, P> {
    chain: C,
    publisher: P,
    router: Router,
    contracts: Vec<EthAddress>,
    publish_retry: RetryPolicy,
}

impl<C, P> Processor<C, P>
where
    C: ChainReader,
    P: Publisher,
{
    /// Construct a processor watching `contracts`, publishing via
    /// `publisher`, reading the chain via `chain`.
    #[must_use]
    pub fn new(chain: C, publisher: P, contracts: Vec<EthAddress>) -> Self {
        Self {
            chain,
            publisher,
            router: Router::new(),
            contracts,
            publish_retry: RetryPolicy::publish_retry(),
        }
    }

    /// Process a single block — the Realtime path. Equivalent to
    /// `process_block_range(n, n)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the range fetch or any publish retry budget is
    /// exhausted.
    #[instrument(skip(self))]
    pub async fn process_block(&self, n: BlockNumber) -> Result<Header> {
        self.process_block_range(n, n).await
    }

    /// Process an inclusive block range — the Backfill path. Preserves
    /// chain order across the range; returns the header of `to` (needed by
    /// the Syncer to update the checkpoint).
    ///
    /// An empty range (`from > to`) is not expected here — callers compute
    /// `to >= from` before dispatching — but is handled defensively by
    /// returning the header of `to` without touching the broker.
    ///
    /// # Errors
    ///
    /// Returns an error if the header/log fetch fails, or if a Publisher
    /// call exhausts its retry budget (the batch aborts without advancing
    /// the checkpoint, per §4.6's all-or-nothing rule).
    #[instrument(skip(self), fields(from = from.get(), to = to.get()))]
    pub async fn process_block_range(&self, from: BlockNumber, to: BlockNumber) -> Result<Header> {
        let header = self.chain.get_block_header(to).await?;

        if from.get() > to.get() {
            return Ok(header);
        }

        let logs = self.chain.filter_logs(from, to, &self.contracts).await?;

        for log in &logs {
            if log.removed {
                warn!(
                    tx_hash = %log.tx_hash,
                    log_index = log.log_index,
                    "skipping removed log"
                );
                continue;
            }

            let block_timestamp = if log.block_number == to {
                header.timestamp
            } else {
                self.chain.get_block_header(log.block_number).await?.timestamp
            };

            let envelope = match self.router.route(log, block_timestamp) {
                Ok(Some(envelope)) => envelope,
                Ok(None) => continue,
                Err(AppError::DecodeError {
                    tx_hash,
                    log_index,
                    reason,
                }) => {
                    warn!(tx_hash, log_index, reason, "decode error, skipping log");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let publisher = &self.publisher;
            retry(self.publish_retry, "publish", || publisher.publish(&envelope)).await?;
        }

        debug!(published = logs.len(), "block range processed");
        Ok(header)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::chain::fakes::FakeChainReader;
    use crate::ports::streaming::mocks::{FailMode, MockPublisher};
    use crate::types::primitives::Hash32;
    use crate::types::raw_log::RawLog;

    fn header(n: u64) -> Header {
        Header {
            number: BlockNumber::new(n),
            hash: Hash32::new([n as u8; 32]),
            timestamp: 1_700_000_000 + n,
        }
    }

    fn order_cancelled_log(n: u64, log_index: u32) -> RawLog {
        use alloy::primitives::B256;
        use alloy::sol_types::SolEvent;

        let event = crate::abi::exchange::OrderCancelled {
            orderHash: B256::repeat_byte(log_index as u8 + 1),
        };
        let encoded = event.encode_log_data();
        RawLog {
            block_number: BlockNumber::new(n),
            block_hash: Hash32::new([n as u8; 32]),
            tx_hash: Hash32::new([log_index as u8; 32]),
            tx_index: 0,
            log_index,
            address: EthAddress::ZERO,
            topics: encoded.topics().iter().map(|t| Hash32::from(*t)).collect(),
            data: encoded.data.to_vec(),
            removed: false,
        }
    }

    #[tokio::test]
    async fn empty_block_range_publishes_nothing_but_advances() {
        let chain = FakeChainReader::new();
        chain.set_block(header(10), vec![]);
        let publisher = MockPublisher::new();
        let processor = Processor::new(chain, publisher, vec![EthAddress::ZERO]);
        let result = processor
            .process_block_range(BlockNumber::new(10), BlockNumber::new(10))
            .await
            .unwrap();
        assert_eq!(result.number.get(), 10);
    }

    #[tokio::test]
    async fn removed_log_is_skipped() {
        let chain = FakeChainReader::new();
        let mut log = order_cancelled_log(5, 0);
        log.removed = true;
        chain.set_block(header(5), vec![log]);
        let publisher = MockPublisher::new();
        let processor = Processor::new(chain, publisher, vec![EthAddress::ZERO]);
        processor
            .process_block_range(BlockNumber::new(5), BlockNumber::new(5))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn decode_error_does_not_abort_batch() {
        let chain = FakeChainReader::new();
        let mut bad_log = order_cancelled_log(5, 0);
        bad_log.data = vec![0xFF];
        chain.set_block(header(5), vec![bad_log]);
        let publisher = MockPublisher::new();
        let processor = Processor::new(chain, publisher, vec![EthAddress::ZERO]);
        let result = processor
            .process_block_range(BlockNumber::new(5), BlockNumber::new(5))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn transient_publish_failure_propagates_after_retries() {
        let chain = FakeChainReader::new();
        chain.set_block(header(5), vec![order_cancelled_log(5, 0)]);
        let publisher = MockPublisher::new();
        publisher.set_fail_mode(Some(FailMode::Transient));
        let processor = Processor::new(chain, publisher, vec![EthAddress::ZERO]);
        let result = processor
            .process_block_range(BlockNumber::new(5), BlockNumber::new(5))
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn empty_range_from_greater_than_to_returns_ok_without_publishing() {
        let chain = FakeChainReader::new();
        chain.set_block(header(5), vec![]);
        let publisher = std::sync::Arc::new(MockPublisher::new());
        let processor = Processor::new(chain, publisher.clone(), vec![EthAddress::ZERO]);
        let result = processor
            .process_block_range(BlockNumber::new(6), BlockNumber::new(5))
            .await;
        assert!(result.is_ok());
        assert_eq!(publisher.count(), 0);
    }
}
