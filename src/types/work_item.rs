//! `WorkItem` — the unit of work the Syncer hands to a Processor worker.

use crate::types::primitives::BlockNumber;

/// A contiguous, inclusive block range dispatched to one Processor worker,
/// tagged with a correlation id for log correlation across the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkItem {
    /// First block in the range (inclusive).
    pub from: BlockNumber,
    /// Last block in the range (inclusive).
    pub to: BlockNumber,
    /// Correlation id, unique within a single Backfill batch, for log
    /// correlation across parallel workers.
    pub correlation_id: u64,
}

impl WorkItem {
    /// Construct a work item over `[from, to]`.
    #[must_use]
    pub const fn new(from: BlockNumber, to: BlockNumber, correlation_id: u64) -> Self {
        Self {
            from,
            to,
            correlation_id,
        }
    }

    /// Whether the range is empty (`from > to`).
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.from.get() > self.to.get()
    }

    /// Split `[from, to]` into up to `workers` contiguous, near-equal
    /// sub-ranges. Never produces more items than blocks in the range;
    /// never produces an empty sub-range.
    #[must_use]
    pub fn split(from: BlockNumber, to: BlockNumber, workers: usize) -> Vec<Self> {
        if from.get() > to.get() || workers == 0 {
            return Vec::new();
        }
        let total = to.get() - from.get() + 1;
        let workers = workers.min(usize::try_from(total).unwrap_or(usize::MAX)).max(1);
        #[allow(clippy::cast_possible_truncation)]
        let workers_u64 = workers as u64;
        let chunk = total / workers_u64;
        let remainder = total % workers_u64;

        let mut items = Vec::with_capacity(workers);
        let mut cursor = from.get();
        for i in 0..workers_u64 {
            let extra = u64::from(i < remainder);
            let size = chunk + extra;
            if size == 0 {
                continue;
            }
            let range_from = cursor;
            let range_to = cursor + size - 1;
            items.push(Self::new(
                BlockNumber::new(range_from),
                BlockNumber::new(range_to),
                i,
            ));
            cursor = range_to + 1;
        }
        items
    }
}
