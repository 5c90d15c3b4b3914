//! Chain Reader port: the sole abstraction over the chain RPC.
//!
//! Implementations must be safe for concurrent use — the Backfill worker
//! pool shares a single instance across tasks (typically an `Arc`-wrapped
//! `alloy` provider over a pooled HTTP client).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::primitives::{BlockNumber, EthAddress};
use crate::types::raw_log::{Header, RawLog};

/// Port for reading chain state: block heights, headers, and event logs.
///
/// # Error Semantics
///
/// Failures are classified at the adapter boundary as
/// [`crate::error::InfraError::RpcTransient`] (network, timeout, rate limit,
/// 5xx) or [`crate::error::InfraError::RpcPermanent`] (malformed request,
/// unknown method). The reader itself never retries; callers decide the
/// retry policy.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// The current chain head height.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails.
    async fn get_latest_block_number(&self) -> Result<BlockNumber>;

    /// Fetch a minimal header for block `n`.
    ///
    /// # Errors
    ///
    /// Returns an error if the block does not exist or the RPC call fails.
    async fn get_block_header(&self, n: BlockNumber) -> Result<Header>;

    /// Every log emitted by any of `contracts` within the inclusive range
    /// `[from, to]`, ordered ascending by `(blockNumber, txIndex, logIndex)`.
    ///
    /// # Errors
    ///
    /// Returns an error if the RPC call fails or the range is rejected by
    /// the node (e.g. exceeds its configured log-range limit).
    async fn filter_logs(
        &self,
        from: BlockNumber,
        to: BlockNumber,
        contracts: &[EthAddress],
    ) -> Result<Vec<RawLog>>;
}

#[async_trait]
impl<T> ChainReader for std::sync::Arc<T>
where
    T: ChainReader + ?Sized,
{
    async fn get_latest_block_number(&self) -> Result<BlockNumber> {
        (**self).get_latest_block_number().await
    }

    async fn get_block_header(&self, n: BlockNumber) -> Result<Header> {
        (**self).get_block_header(n).await
    }

    async fn filter_logs(
        &self,
        from: BlockNumber,
        to: BlockNumber,
        contracts: &[EthAddress],
    ) -> Result<Vec<RawLog>> {
        (**self).filter_logs(from, to, contracts).await
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod fakes {
    //! An in-memory `ChainReader` for unit and scenario tests.

    use std::collections::BTreeMap;
    use std::sync::Mutex;

    use super::*;

    /// A fixed, in-memory chain: a map of block number to header plus the
    /// logs emitted in that block. Scenario tests seed it once and drive
    /// the Syncer/Processor against it.
    #[derive(Debug, Default)]
    pub struct FakeChainReader {
        headers: Mutex<BTreeMap<u64, Header>>,
        logs: Mutex<BTreeMap<u64, Vec<RawLog>>>,
    }

    impl FakeChainReader {
        /// An empty fake chain at height zero.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Insert or replace a block's header and logs.
        pub fn set_block(&self, header: Header, logs: Vec<RawLog>) {
            self.headers.lock().unwrap().insert(header.number.get(), header);
            self.logs.lock().unwrap().insert(header.number.get(), logs);
        }

        /// Remove a block, simulating a reorg that orphans it.
        pub fn remove_block(&self, number: u64) {
            self.headers.lock().unwrap().remove(&number);
            self.logs.lock().unwrap().remove(&number);
        }
    }

    #[async_trait]
    impl ChainReader for FakeChainReader {
        async fn get_latest_block_number(&self) -> Result<BlockNumber> {
            Ok(BlockNumber::new(
                self.headers.lock().unwrap().keys().next_back().copied().unwrap_or(0),
            ))
        }

        async fn get_block_header(&self, n: BlockNumber) -> Result<Header> {
            self.headers
                .lock()
                .unwrap()
                .get(&n.get())
                .copied()
                .ok_or_else(|| {
                    crate::error::AppError::Infra(crate::error::InfraError::RpcPermanent(
                        format!("no such block: {}", n.get()).into(),
                    ))
                })
        }

        async fn filter_logs(
            &self,
            from: BlockNumber,
            to: BlockNumber,
            contracts: &[EthAddress],
        ) -> Result<Vec<RawLog>> {
            let logs = self.logs.lock().unwrap();
            let mut matched: Vec<RawLog> = logs
                .range(from.get()..=to.get())
                .flat_map(|(_, block_logs)| block_logs.iter().cloned())
                .filter(|log| contracts.is_empty() || contracts.contains(&log.address))
                .collect();
            matched.sort_by_key(RawLog::order_key);
            Ok(matched)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::FakeChainReader;
    use super::*;
    use crate::types::primitives::Hash32;

    fn header(n: u64) -> Header {
        Header {
            number: BlockNumber::new(n),
            hash: Hash32::new([n as u8; 32]),
            timestamp: 1_700_000_000 + n,
        }
    }

    #[tokio::test]
    async fn latest_block_number_tracks_highest_inserted() {
        let reader = FakeChainReader::new();
        reader.set_block(header(10), vec![]);
        reader.set_block(header(20), vec![]);
        assert_eq!(reader.get_latest_block_number().await.unwrap().get(), 20);
    }

    #[tokio::test]
    async fn filter_logs_orders_by_block_then_index() {
        let reader = FakeChainReader::new();
        let addr = EthAddress::ZERO;
        let log_a = RawLog {
            block_number: BlockNumber::new(5),
            block_hash: Hash32::ZERO,
            tx_hash: Hash32::ZERO,
            tx_index: 0,
            log_index: 1,
            address: addr,
            topics: vec![],
            data: vec![],
            removed: false,
        };
        let log_b = RawLog {
            log_index: 0,
            ..log_a.clone()
        };
        reader.set_block(header(5), vec![log_a.clone(), log_b.clone()]);
        let logs = reader
            .filter_logs(BlockNumber::new(5), BlockNumber::new(5), &[addr])
            .await
            .unwrap();
        assert_eq!(logs, vec![log_b, log_a]);
    }

    #[tokio::test]
    async fn removed_block_drops_its_logs() {
        let reader = FakeChainReader::new();
        reader.set_block(header(1), vec![]);
        reader.remove_block(1);
        assert!(reader.get_block_header(BlockNumber::new(1)).await.is_err());
    }
}
