//! Durable event delivery via Apache Iggy.
//!
//! This module provides the production [`Publisher`](crate::ports::streaming::Publisher)
//! implementation, backed by Apache Iggy — a high-performance message
//! streaming platform.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────────┐
//! │                              Event Flow                                      │
//! │                                                                             │
//! │  ┌──────────────┐     ┌──────────────────┐     ┌──────────────────────────┐ │
//! │  │  Batch        │────▶│  IggyPublisher   │────▶│     Apache Iggy          │ │
//! │  │  Processor    │     │  (serialize &    │     │  (stream + topics)       │ │
//! │  └──────────────┘     │   send)          │     └──────────────────────────┘ │
//! │                       └──────────────────┘                                  │
//! └─────────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Topics
//!
//! One Iggy topic per registered event kind (§4.2), all under a single
//! stream. The full `"{prefix}.{eventName}.{contractAddress}"` subject
//! (§4.4) travels inside the published payload; Iggy itself only routes on
//! event name.
//!
//! # Usage
//!
//! ```ignore
//! use polymarket_indexer::streaming::IggyPublisher;
//! use polymarket_indexer::config::IggySettings;
//!
//! let publisher = IggyPublisher::new(&settings.iggy)?;
//! publisher.publish(&envelope).await?;
//! ```

mod iggy_publisher;
mod topics;

pub use iggy_publisher::IggyPublisher;
pub use topics::{STREAM_NAME, Topic, subject};
