//! Apache Iggy event publisher implementation.
//!
//! Implements the [`Publisher`] port using Apache Iggy as the streaming
//! backend (§4.6). One Iggy topic per registered event kind, created lazily
//! the first time it's needed and thereafter idempotently reused.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use alloy::primitives::keccak256;
use async_trait::async_trait;
use bytes::Bytes;
use iggy::client::{Client, MessageClient, StreamClient, TopicClient};
use iggy::clients::client::IggyClient;
use iggy::compression::compression_algorithm::CompressionAlgorithm;
use iggy::identifier::Identifier;
use iggy::messages::send_messages::{Message, Partitioning};
use iggy::utils::expiry::IggyExpiry;
use iggy::utils::topic_size::MaxTopicSize;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument};

use crate::config::IggySettings;
use crate::error::{InfraError, Result};
use crate::ports::streaming::Publisher;
use crate::types::events::Envelope;

use super::topics::Topic;

/// Apache Iggy-based event publisher.
///
/// Connects to an Iggy server and publishes decoded events to the topic
/// matching their event name. Stream/topic creation is lazy and
/// idempotent; reconnection is handled the same way.
///
/// # Thread Safety
///
/// This type is `Send + Sync` and can be shared across tasks.
pub struct IggyPublisher {
    client: Arc<IggyClient>,
    stream_name: String,
    partition_count: u32,
    connected: AtomicBool,
    initialized: AtomicBool,
    init_lock: RwLock<()>,
}

impl std::fmt::Debug for IggyPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IggyPublisher")
            .field("stream_name", &self.stream_name)
            .field("partition_count", &self.partition_count)
            .field("connected", &self.connected.load(Ordering::SeqCst))
            .field("initialized", &self.initialized.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

impl IggyPublisher {
    /// Create a new Iggy publisher from settings.
    ///
    /// This creates the client but does NOT connect. Connection happens
    /// lazily on first publish.
    ///
    /// # Errors
    ///
    /// Returns an error if the client cannot be created.
    pub fn new(settings: &IggySettings) -> Result<Self> {
        let client = IggyClient::builder()
            .with_tcp()
            .with_server_address(settings.url.clone())
            .build()
            .map_err(|e| InfraError::PublishPermanent(Box::new(e)))?;

        Ok(Self {
            client: Arc::new(client),
            stream_name: settings.stream_name.clone(),
            partition_count: settings.partition_count,
            connected: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            init_lock: RwLock::new(()),
        })
    }

    /// Connect to the Iggy server.
    ///
    /// # Errors
    ///
    /// Returns an error if connection fails.
    #[instrument(skip(self))]
    pub async fn connect(&self) -> Result<()> {
        self.client
            .connect()
            .await
            .map_err(|e| InfraError::PublishTransient(Box::new(e)))?;

        self.connected.store(true, Ordering::SeqCst);
        info!(stream = %self.stream_name, "connected to Iggy server");
        Ok(())
    }

    /// Disconnect from the Iggy server.
    ///
    /// # Errors
    ///
    /// Returns an error if disconnection fails.
    pub async fn disconnect(&self) -> Result<()> {
        self.client
            .disconnect()
            .await
            .map_err(|e| InfraError::PublishTransient(Box::new(e)))?;

        self.connected.store(false, Ordering::SeqCst);
        self.initialized.store(false, Ordering::SeqCst);
        info!("disconnected from Iggy server");
        Ok(())
    }

    /// Ensure the stream and every registered topic exist. Lazy, idempotent,
    /// and safe to call concurrently — a double-checked lock keeps races
    /// from attempting creation twice.
    #[instrument(skip(self))]
    async fn ensure_initialized(&self) -> Result<()> {
        if self.initialized.load(Ordering::SeqCst) {
            return Ok(());
        }

        let _guard = self.init_lock.write().await;
        if self.initialized.load(Ordering::SeqCst) {
            return Ok(());
        }

        if !self.connected.load(Ordering::SeqCst) {
            self.connect().await?;
        }

        self.ensure_stream_exists().await?;
        for topic in Topic::all() {
            self.ensure_topic_exists(*topic).await?;
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!(stream = %self.stream_name, "initialized Iggy stream and topics");
        Ok(())
    }

    async fn ensure_stream_exists(&self) -> Result<()> {
        let stream_id = Identifier::from_str_value(&self.stream_name)
            .map_err(|e| InfraError::PublishPermanent(Box::new(e)))?;

        match self.client.get_stream(&stream_id).await {
            Ok(Some(_)) => {
                debug!(stream = %self.stream_name, "stream already exists");
                return Ok(());
            }
            Ok(None) => {}
            Err(e) => {
                let err_str = e.to_string();
                if !err_str.contains("not found") && !err_str.contains("NotFound") {
                    return Err(InfraError::PublishTransient(Box::new(e)).into());
                }
            }
        }

        match self.client.create_stream(&self.stream_name, Some(1)).await {
            Ok(_) => {
                info!(stream = %self.stream_name, "created Iggy stream");
                Ok(())
            }
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("already exists") || err_str.contains("AlreadyExists") {
                    debug!(stream = %self.stream_name, "stream already exists (race)");
                    Ok(())
                } else {
                    Err(InfraError::PublishTransient(Box::new(e)).into())
                }
            }
        }
    }

    async fn ensure_topic_exists(&self, topic: Topic) -> Result<()> {
        let stream_id = Identifier::from_str_value(&self.stream_name)
            .map_err(|e| InfraError::PublishPermanent(Box::new(e)))?;
        let topic_id = Identifier::from_str_value(topic.as_str())
            .map_err(|e| InfraError::PublishPermanent(Box::new(e)))?;

        match self.client.get_topic(&stream_id, &topic_id).await {
            Ok(Some(_)) => {
                debug!(topic = %topic, "topic already exists");
                return Ok(());
            }
            Ok(None) => {}
            Err(e) => {
                let err_str = e.to_string();
                if !err_str.contains("not found") && !err_str.contains("NotFound") {
                    return Err(InfraError::PublishTransient(Box::new(e)).into());
                }
            }
        }

        match self
            .client
            .create_topic(
                &stream_id,
                topic.as_str(),
                self.partition_count,
                CompressionAlgorithm::None,
                None,
                None,
                IggyExpiry::ServerDefault,
                MaxTopicSize::ServerDefault,
            )
            .await
        {
            Ok(_) => {
                info!(topic = %topic, partitions = self.partition_count, "created Iggy topic");
                Ok(())
            }
            Err(e) => {
                let err_str = e.to_string();
                if err_str.contains("already exists") || err_str.contains("AlreadyExists") {
                    debug!(topic = %topic, "topic already exists (race)");
                    Ok(())
                } else {
                    Err(InfraError::PublishTransient(Box::new(e)).into())
                }
            }
        }
    }

    /// Serialize an event envelope to JSON bytes.
    fn serialize_event(event: &Envelope) -> Result<Bytes> {
        serde_json::to_vec(event)
            .map(Bytes::from)
            .map_err(|e| InfraError::Serialization(e).into())
    }

    /// Build the outbound Iggy message for an event, deriving a deterministic
    /// id from the dedup key so a broker configured for message-level
    /// deduplication can drop redundant republishes after a retried batch
    /// (§4.4, §4.6).
    fn create_message(event: &Envelope) -> Result<Message> {
        let payload = Self::serialize_event(event)?;
        // Message payload length is capped at u32::MAX by the Iggy wire
        // protocol; envelope payloads are always far smaller.
        #[allow(clippy::cast_possible_truncation)]
        let length = payload.len() as u32;

        let digest = keccak256(event.dedup_key().as_bytes());
        let mut id_bytes = [0u8; 16];
        id_bytes.copy_from_slice(&digest[0..16]);
        let id = u128::from_be_bytes(id_bytes);

        Ok(Message {
            id,
            length,
            payload,
            headers: None,
        })
    }

    #[instrument(skip(self, message), fields(topic = %topic))]
    async fn send_to_topic(&self, topic: Topic, message: &mut Message) -> Result<()> {
        let stream_id = Identifier::from_str_value(&self.stream_name)
            .map_err(|e| InfraError::PublishPermanent(Box::new(e)))?;
        let topic_id = Identifier::from_str_value(topic.as_str())
            .map_err(|e| InfraError::PublishPermanent(Box::new(e)))?;

        self.client
            .send_messages(
                &stream_id,
                &topic_id,
                &Partitioning::balanced(),
                std::slice::from_mut(message),
            )
            .await
            .map_err(|e| InfraError::PublishTransient(Box::new(e)))?;

        debug!(topic = %topic, "published event to Iggy");
        Ok(())
    }
}

#[async_trait]
impl Publisher for IggyPublisher {
    #[instrument(skip(self, event), fields(event_name = %event.event_name, dedup_key = %event.dedup_key()))]
    async fn publish(&self, event: &Envelope) -> Result<()> {
        self.ensure_initialized().await?;

        let topic = Topic::for_envelope(event);
        let mut message = Self::create_message(event)?;

        self.send_to_topic(topic, &mut message).await
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_settings() -> IggySettings {
        IggySettings {
            url: "tcp://localhost:8090".to_string(),
            stream_name: "polymarket-indexer-test".to_string(),
            partition_count: 1,
            replication_factor: 1,
            username: "iggy".to_string(),
            password: "iggy".to_string(),
        }
    }

    #[test]
    fn publisher_debug_format() {
        let publisher = IggyPublisher::new(&test_settings()).unwrap();
        let debug_str = format!("{publisher:?}");
        assert!(debug_str.contains("IggyPublisher"));
        assert!(debug_str.contains("polymarket-indexer-test"));
    }

    #[test]
    fn freshly_created_publisher_is_not_connected() {
        let publisher = IggyPublisher::new(&test_settings()).unwrap();
        assert!(!publisher.is_connected());
    }

    #[test]
    fn message_id_is_deterministic_for_same_dedup_key() {
        use crate::types::events::{OrderCancelled, Payload};
        use crate::types::primitives::{BlockNumber, EthAddress, Hash32};

        let event = Envelope {
            block_number: BlockNumber::new(1),
            block_hash: Hash32::ZERO,
            tx_hash: Hash32::new([0xAB; 32]),
            tx_index: 0,
            log_index: 5,
            contract: EthAddress::ZERO,
            event_name: "OrderCancelled".into(),
            event_sig: Hash32::ZERO,
            block_timestamp: 0,
            success: true,
            payload: Payload::OrderCancelled(OrderCancelled {
                order_hash: Hash32::ZERO,
            }),
        };

        let first = IggyPublisher::create_message(&event).unwrap();
        let second = IggyPublisher::create_message(&event).unwrap();
        assert_eq!(first.id, second.id);
    }
}
