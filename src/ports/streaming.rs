//! Durable Publisher port: the sink every decoded event flows to.
//!
//! Publishers own dedup-key assignment and subject routing (§4.4); the
//! Processor only knows "ok, retry me, or give up".

use async_trait::async_trait;

use crate::error::Result;
use crate::types::events::Envelope;

/// Port for publishing decoded events to a durable, replayable log.
///
/// # Implementation Notes
///
/// Implementations should:
/// - Derive the dedup key from `event.dedup_key()` (`"{txHash}-{logIndex}"`).
/// - Route by a subject built from `"{prefix}.{eventName}.{contractAddress}"`.
/// - Distinguish transient broker failures (surfaced so the Processor
///   retries the batch) from permanent ones (surfaced so the batch aborts).
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish a single decoded event.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::AppError::Infra`] wrapping
    /// [`crate::error::InfraError::PublishTransient`] or
    /// [`crate::error::InfraError::PublishPermanent`] depending on the
    /// underlying failure.
    async fn publish(&self, event: &Envelope) -> Result<()>;

    /// Whether the publisher currently holds a live connection to the
    /// broker. Best-effort; used for health reporting only.
    fn is_connected(&self) -> bool;
}

#[async_trait]
impl<T> Publisher for std::sync::Arc<T>
where
    T: Publisher + ?Sized,
{
    async fn publish(&self, event: &Envelope) -> Result<()> {
        (**self).publish(event).await
    }

    fn is_connected(&self) -> bool {
        (**self).is_connected()
    }
}

/// A publisher that discards every event — used for local/dev runs where no
/// broker is configured (§2 process composition).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpPublisher;

#[async_trait]
impl Publisher for NoOpPublisher {
    async fn publish(&self, _event: &Envelope) -> Result<()> {
        Ok(())
    }

    fn is_connected(&self) -> bool {
        true
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub mod mocks {
    //! A recording publisher for unit and scenario tests.

    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;

    /// How a [`MockPublisher`] should fail its next `publish` calls.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum FailMode {
        /// Fail every call with a transient error.
        Transient,
        /// Fail every call with a permanent error.
        Permanent,
    }

    /// Publisher that records every event it receives and can be told to
    /// fail transiently, permanently, or not at all.
    #[derive(Debug, Default)]
    pub struct MockPublisher {
        published: Mutex<Vec<Envelope>>,
        connected: AtomicBool,
        fail_mode: Mutex<Option<FailMode>>,
    }

    impl MockPublisher {
        /// A connected publisher with no failures configured.
        #[must_use]
        pub fn new() -> Self {
            Self {
                published: Mutex::new(Vec::new()),
                connected: AtomicBool::new(true),
                fail_mode: Mutex::new(None),
            }
        }

        /// Configure the publisher to fail subsequent calls per `mode`, or
        /// pass `None` to resume succeeding.
        pub fn set_fail_mode(&self, mode: Option<FailMode>) {
            *self.fail_mode.lock().unwrap() = mode;
        }

        /// Every event successfully published so far, in call order.
        #[must_use]
        pub fn published(&self) -> Vec<Envelope> {
            self.published.lock().unwrap().clone()
        }

        /// Number of events successfully published.
        #[must_use]
        pub fn count(&self) -> usize {
            self.published.lock().unwrap().len()
        }

        /// Set the simulated connection state.
        pub fn set_connected(&self, connected: bool) {
            self.connected.store(connected, Ordering::SeqCst);
        }
    }

    #[async_trait]
    impl Publisher for MockPublisher {
        async fn publish(&self, event: &Envelope) -> Result<()> {
            match *self.fail_mode.lock().unwrap() {
                Some(FailMode::Transient) => {
                    return Err(crate::error::AppError::Infra(
                        crate::error::InfraError::PublishTransient("mock transient failure".into()),
                    ));
                }
                Some(FailMode::Permanent) => {
                    return Err(crate::error::AppError::Infra(
                        crate::error::InfraError::PublishPermanent("mock permanent failure".into()),
                    ));
                }
                None => {}
            }
            self.published.lock().unwrap().push(event.clone());
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected.load(Ordering::SeqCst)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::{FailMode, MockPublisher};
    use super::*;
    use crate::types::events::{OrderCancelled, Payload};
    use crate::types::primitives::{BlockNumber, EthAddress, Hash32};

    fn sample_event() -> Envelope {
        Envelope {
            block_number: BlockNumber::new(1),
            block_hash: Hash32::ZERO,
            tx_hash: Hash32::ZERO,
            tx_index: 0,
            log_index: 0,
            contract: EthAddress::ZERO,
            event_name: "OrderCancelled".into(),
            event_sig: Hash32::ZERO,
            block_timestamp: 0,
            success: true,
            payload: Payload::OrderCancelled(OrderCancelled {
                order_hash: Hash32::ZERO,
            }),
        }
    }

    #[tokio::test]
    async fn no_op_publisher_always_succeeds() {
        let publisher = NoOpPublisher;
        assert!(publisher.publish(&sample_event()).await.is_ok());
        assert!(publisher.is_connected());
    }

    #[tokio::test]
    async fn mock_publisher_records_published_events() {
        let publisher = MockPublisher::new();
        publisher.publish(&sample_event()).await.unwrap();
        assert_eq!(publisher.count(), 1);
    }

    #[tokio::test]
    async fn mock_publisher_transient_failure_is_retryable() {
        let publisher = MockPublisher::new();
        publisher.set_fail_mode(Some(FailMode::Transient));
        let err = publisher.publish(&sample_event()).await.unwrap_err();
        assert!(err.is_transient());
        assert_eq!(publisher.count(), 0);
    }

    #[tokio::test]
    async fn mock_publisher_permanent_failure_is_not_transient() {
        let publisher = MockPublisher::new();
        publisher.set_fail_mode(Some(FailMode::Permanent));
        let err = publisher.publish(&sample_event()).await.unwrap_err();
        assert!(!err.is_transient());
    }
}
