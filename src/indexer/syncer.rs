//! Syncer: the top-level state machine (§4.7).
//!
//! A single instance drives everything — it loads the checkpoint, decides
//! whether to backfill or track the chain head in realtime, reorg-checks
//! every cycle, dispatches work to the [`Processor`], and is the only
//! component that ever writes the checkpoint.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::error::{AppError, Result};
use crate::indexer::block_processor::Processor;
use crate::indexer::reorg_handler::{self, ReorgCheck};
use crate::indexer::retry::{retry, RetryPolicy};
use crate::ports::chain::ChainReader;
use crate::ports::store::CheckpointStore;
use crate::ports::streaming::Publisher;
use crate::types::primitives::{BlockNumber, Hash32};
use crate::types::work_item::WorkItem;

/// The Syncer's operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncerState {
    /// Deciding Backfill vs Realtime from the loaded checkpoint.
    Starting,
    /// Catching up in fixed-size, worker-parallel batches.
    Backfill,
    /// Tracking the chain head one block at a time.
    Realtime,
    /// The cancellation signal has been observed; the loop has returned.
    Stopped,
}

/// Tuning knobs for the Syncer (§4.7's Configuration list).
#[derive(Debug, Clone)]
pub struct SyncerConfig {
    /// Primary key under which the checkpoint is stored.
    pub service_name: String,
    /// Block to start from when no checkpoint exists yet.
    pub start_block: BlockNumber,
    /// Blocks per Backfill batch.
    pub batch_size: u64,
    /// Backfill worker-pool size.
    pub workers: usize,
    /// Delay between Realtime polls.
    pub poll_interval: Duration,
    /// Blocks behind the chain head considered final.
    pub confirmations: u64,
    /// How long a run of Transient errors may persist before `Healthy()`
    /// flips to false.
    pub unhealthy_threshold: Duration,
}

impl SyncerConfig {
    /// Construct a config with the reference unhealthy threshold (5 minutes).
    #[must_use]
    pub const fn new(
        service_name: String,
        start_block: BlockNumber,
        batch_size: u64,
        workers: usize,
        poll_interval: Duration,
        confirmations: u64,
    ) -> Self {
        Self {
            service_name,
            start_block,
            batch_size,
            workers,
            poll_interval,
            confirmations,
            unhealthy_threshold: Duration::from_secs(300),
        }
    }
}

/// Owns the top-level loop: checkpoint lifecycle, mode transitions, the
/// Backfill worker pool, the Realtime poll, and the reorg check.
pub struct Syncer<C, S, P> {
    chain: C,
    checkpoint_store: S,
    processor: Processor<C, P>,
    config: SyncerConfig,
    batch_retry: RetryPolicy,
    healthy: AtomicBool,
    unhealthy_since: Mutex<Option<Instant>>,
}

impl<C, S, P> Syncer<C, S, P>
where
    C: ChainReader + Clone + 'static,
    S: CheckpointStore,
    P: Publisher + Clone + 'static,
{
    /// Build a Syncer. `chain` and the chain reader inside `processor` are
    /// expected to be the same logical adapter (typically both an
    /// `Arc`-wrapped concrete reader), so checkpoint/reorg reads and
    /// batch dispatch see a consistent view.
    #[must_use]
    pub fn new(chain: C, checkpoint_store: S, processor: Processor<C, P>, config: SyncerConfig) -> Self {
        Self {
            chain,
            checkpoint_store,
            processor,
            config,
            batch_retry: RetryPolicy::batch_retry(),
            healthy: AtomicBool::new(true),
            unhealthy_since: Mutex::new(None),
        }
    }

    /// Whether the last cycle completed without error, or any ongoing
    /// Transient error run has not yet exceeded the unhealthy threshold.
    #[must_use]
    pub fn healthy(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }

    /// Run until `shutdown` is cancelled or a Permanent error occurs.
    ///
    /// # Errors
    ///
    /// Returns an error when a cycle fails with a non-transient
    /// [`AppError`]; a clean shutdown always returns `Ok(())`.
    #[instrument(skip(self, shutdown), fields(service = %self.config.service_name))]
    pub async fn run(&self, shutdown: CancellationToken) -> Result<()> {
        let mut checkpoint = self
            .checkpoint_store
            .get_or_create(&self.config.service_name, self.config.start_block)
            .await?;
        // A zero hash means `checkpoint.last_block` has never actually been
        // published (true on a fresh deployment, since `Checkpoint::fresh`
        // seeds `last_block = startBlock` without having processed it).
        // Treat it as one block behind so the first cycle fetches
        // `startBlock` itself rather than skipping it.
        let mut current = if checkpoint.last_block_hash.is_zero() {
            checkpoint.last_block.prev()
        } else {
            checkpoint.last_block
        };

        loop {
            if shutdown.is_cancelled() {
                info!("shutdown observed, stopping syncer");
                return Ok(());
            }

            match reorg_handler::check(
                &self.chain,
                &checkpoint,
                self.config.start_block,
                self.config.confirmations,
            )
            .await
            {
                Ok(ReorgCheck::Canonical) => {}
                Ok(ReorgCheck::Reorged { rewind_to }) => {
                    self.checkpoint_store
                        .update(&self.config.service_name, rewind_to, Hash32::ZERO)
                        .await?;
                    checkpoint.last_block = rewind_to;
                    checkpoint.last_block_hash = Hash32::ZERO;
                    current = rewind_to;
                    self.record_cycle(Ok(()));
                }
                Err(err) => {
                    if self.wait_and_retry_or_abort(&err, &shutdown).await? {
                        continue;
                    }
                    return Err(err);
                }
            }

            let latest = match self.chain.get_latest_block_number().await {
                Ok(latest) => latest,
                Err(err) => {
                    if self.wait_and_retry_or_abort(&err, &shutdown).await? {
                        continue;
                    }
                    return Err(err);
                }
            };
            let safe_head = BlockNumber::new(latest.get().saturating_sub(self.config.confirmations));
            let behind = safe_head.get().saturating_sub(current.get());
            let state = if behind > 2 * self.config.batch_size {
                SyncerState::Backfill
            } else {
                SyncerState::Realtime
            };

            let cycle = match state {
                SyncerState::Backfill => self.backfill_cycle(current, safe_head).await,
                SyncerState::Realtime => self.realtime_cycle(current, safe_head, &shutdown).await,
                SyncerState::Starting | SyncerState::Stopped => unreachable!("recomputed every cycle"),
            };

            match cycle {
                Ok(new_current) => {
                    self.record_cycle(Ok(()));
                    if new_current != current {
                        if let Ok(header) = self.chain.get_block_header(new_current).await {
                            checkpoint.last_block = new_current;
                            checkpoint.last_block_hash = header.hash;
                        }
                    }
                    current = new_current;
                    if state == SyncerState::Realtime {
                        tokio::select! {
                            () = shutdown.cancelled() => return Ok(()),
                            () = tokio::time::sleep(self.config.poll_interval) => {}
                        }
                    }
                }
                Err(err) => {
                    if self.wait_and_retry_or_abort(&err, &shutdown).await? {
                        continue;
                    }
                    return Err(err);
                }
            }
        }
    }

    /// One Backfill step: dispatch `[current+1, rangeEnd]` split across the
    /// worker pool, wait for all workers, commit once on total success.
    #[instrument(skip(self), fields(current = current.get(), safe_head = safe_head.get()))]
    async fn backfill_cycle(&self, current: BlockNumber, safe_head: BlockNumber) -> Result<BlockNumber> {
        let range_end = BlockNumber::new(current.get().saturating_add(self.config.batch_size).min(safe_head.get()));
        if range_end.get() <= current.get() {
            return Ok(current);
        }
        let items = WorkItem::split(BlockNumber::new(current.get() + 1), range_end, self.config.workers);
        if items.is_empty() {
            return Ok(current);
        }

        retry(self.batch_retry, "backfill_batch", || async {
            let mut handles = Vec::with_capacity(items.len());
            for item in &items {
                let processor = self.processor.clone();
                let item = *item;
                handles.push(tokio::spawn(async move {
                    processor.process_block_range(item.from, item.to).await
                }));
            }
            for handle in handles {
                handle
                    .await
                    .map_err(|err| {
                        AppError::Infra(crate::error::InfraError::Internal(format!(
                            "backfill worker task panicked: {err}"
                        )))
                    })??;
            }
            Ok(())
        })
        .await?;

        self.checkpoint_store
            .update(&self.config.service_name, range_end, self.chain.get_block_header(range_end).await?.hash)
            .await?;
        Ok(range_end)
    }

    /// One Realtime step: sequentially process every block up to
    /// `safe_head`, committing the checkpoint after each.
    #[instrument(skip(self, shutdown), fields(current = current.get(), safe_head = safe_head.get()))]
    async fn realtime_cycle(
        &self,
        current: BlockNumber,
        safe_head: BlockNumber,
        shutdown: &CancellationToken,
    ) -> Result<BlockNumber> {
        let mut current = current;
        let mut n = current.get() + 1;
        while n <= safe_head.get() {
            if shutdown.is_cancelled() {
                return Ok(current);
            }
            let block = BlockNumber::new(n);
            let header = retry(self.batch_retry, "process_block", || self.processor.process_block(block)).await?;
            self.checkpoint_store
                .update(&self.config.service_name, block, header.hash)
                .await?;
            current = block;
            n += 1;
        }
        Ok(current)
    }

    /// On a Transient error, sleep `poll_interval` and signal "retry
    /// the same cycle" (`Ok(true)`) unless cancelled meanwhile. On a
    /// Permanent error, signal "propagate" (`Ok(false)`).
    async fn wait_and_retry_or_abort(&self, err: &AppError, shutdown: &CancellationToken) -> Result<bool> {
        self.record_cycle(Err(err));
        if !err.is_transient() {
            return Ok(false);
        }
        warn!(error = %err, "transient cycle error, backing off");
        tokio::select! {
            () = shutdown.cancelled() => Ok(false),
            () = tokio::time::sleep(self.config.poll_interval) => Ok(true),
        }
    }

    fn record_cycle(&self, result: Result<(), &AppError>) {
        match result {
            Ok(()) => {
                self.healthy.store(true, Ordering::SeqCst);
                *self.unhealthy_since.lock().unwrap() = None;
            }
            Err(err) if err.is_transient() => {
                let mut since = self.unhealthy_since.lock().unwrap();
                let first = *since.get_or_insert_with(Instant::now);
                if first.elapsed() > self.config.unhealthy_threshold {
                    self.healthy.store(false, Ordering::SeqCst);
                }
            }
            Err(_) => {
                self.healthy.store(false, Ordering::SeqCst);
            }
        }
    }
}
