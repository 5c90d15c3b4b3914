//! Checkpoint Store port: the indexer's only durable, owned state.
//!
//! A tiny atomic key/value contract keyed by service name, giving the
//! Syncer crash-safe resume and a basis for reorg detection (§4.5).

use async_trait::async_trait;

use crate::error::Result;
use crate::types::checkpoint::Checkpoint;
use crate::types::primitives::{BlockNumber, Hash32};

/// Port for checkpoint persistence.
///
/// # Implementation Notes
///
/// Implementations must:
/// - Flush to stable storage before returning from `update`.
/// - Never expose a partially-written record — a crash mid-write must
///   leave the previous value intact, not a torn one.
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Read the checkpoint for `service_name`, inserting a fresh one with
    /// `last_block = default_start_block` if none exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage is unreachable or the
    /// insert fails.
    async fn get_or_create(
        &self,
        service_name: &str,
        default_start_block: BlockNumber,
    ) -> Result<Checkpoint>;

    /// Atomically replace the `(last_block, last_block_hash)` fields for
    /// `service_name`. The record must already exist (created via
    /// `get_or_create`).
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage is unreachable or the
    /// service has no existing checkpoint row.
    async fn update(
        &self,
        service_name: &str,
        last_block: BlockNumber,
        last_block_hash: Hash32,
    ) -> Result<()>;
}

#[async_trait]
impl<T> CheckpointStore for std::sync::Arc<T>
where
    T: CheckpointStore + ?Sized,
{
    async fn get_or_create(
        &self,
        service_name: &str,
        default_start_block: BlockNumber,
    ) -> Result<Checkpoint> {
        (**self).get_or_create(service_name, default_start_block).await
    }

    async fn update(
        &self,
        service_name: &str,
        last_block: BlockNumber,
        last_block_hash: Hash32,
    ) -> Result<()> {
        (**self).update(service_name, last_block, last_block_hash).await
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod fakes {
    //! An in-memory `CheckpointStore` for unit and scenario tests.

    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// In-memory checkpoint store, one row per service name.
    #[derive(Debug, Default)]
    pub struct FakeCheckpointStore {
        rows: Mutex<HashMap<String, Checkpoint>>,
    }

    impl FakeCheckpointStore {
        /// An empty store.
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// Snapshot the current checkpoint for a service, if any.
        #[must_use]
        pub fn get(&self, service_name: &str) -> Option<Checkpoint> {
            self.rows.lock().unwrap().get(service_name).cloned()
        }
    }

    #[async_trait]
    impl CheckpointStore for FakeCheckpointStore {
        async fn get_or_create(
            &self,
            service_name: &str,
            default_start_block: BlockNumber,
        ) -> Result<Checkpoint> {
            let mut rows = self.rows.lock().unwrap();
            Ok(rows
                .entry(service_name.to_string())
                .or_insert_with(|| Checkpoint::fresh(service_name, default_start_block))
                .clone())
        }

        async fn update(
            &self,
            service_name: &str,
            last_block: BlockNumber,
            last_block_hash: Hash32,
        ) -> Result<()> {
            let mut rows = self.rows.lock().unwrap();
            let Some(row) = rows.get_mut(service_name) else {
                return Err(crate::error::AppError::Infra(
                    crate::error::InfraError::Internal(format!(
                        "update called before get_or_create for service {service_name}"
                    )),
                ));
            };
            row.last_block = last_block;
            row.last_block_hash = last_block_hash;
            row.updated_at = chrono::Utc::now();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::FakeCheckpointStore;
    use super::*;

    #[tokio::test]
    async fn get_or_create_is_idempotent() {
        let store = FakeCheckpointStore::new();
        let first = store
            .get_or_create("polymarket-indexer", BlockNumber::new(1000))
            .await
            .unwrap();
        let second = store
            .get_or_create("polymarket-indexer", BlockNumber::new(5000))
            .await
            .unwrap();
        assert_eq!(first.last_block, second.last_block);
        assert_eq!(first.last_block.get(), 1000);
    }

    #[tokio::test]
    async fn update_replaces_last_block_and_hash() {
        let store = FakeCheckpointStore::new();
        store
            .get_or_create("svc", BlockNumber::new(0))
            .await
            .unwrap();
        let new_hash = Hash32::new([0x42; 32]);
        store
            .update("svc", BlockNumber::new(100), new_hash)
            .await
            .unwrap();
        let checkpoint = store.get("svc").unwrap();
        assert_eq!(checkpoint.last_block.get(), 100);
        assert_eq!(checkpoint.last_block_hash, new_hash);
    }

    #[tokio::test]
    async fn update_without_prior_create_fails() {
        let store = FakeCheckpointStore::new();
        let result = store
            .update("svc", BlockNumber::new(1), Hash32::ZERO)
            .await;
        assert!(result.is_err());
    }
}
