//! Subject and topic mapping for published events (§4.4).
//!
//! Every event is routed to a subject built from
//! `"{prefix}.{eventName}.{contractAddress}"`, letting a consumer subscribe
//! to a whole event kind, a single contract, or everything under the
//! stream's prefix. Apache Iggy has no notion of an arbitrary subject
//! hierarchy — only a fixed stream/topic/partition tree — so the full
//! subject is carried in the published payload and the event name alone
//! picks the Iggy topic; the contract address is left to consumers filtering
//! on the payload, and to the broker's partition balancing.

use crate::types::events::Envelope;

/// Default stream name for Polymarket indexer events.
pub const STREAM_NAME: &str = "polymarket-indexer";

/// Build the subject an event is published under.
#[must_use]
pub fn subject(prefix: &str, event: &Envelope) -> String {
    format!("{prefix}.{}.{}", event.event_name, event.contract)
}

/// The fixed set of Iggy topics this indexer publishes to — one per
/// registered event kind (§4.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    OrderFilled,
    OrderCancelled,
    TokenRegistered,
    TransferSingle,
    TransferBatch,
    ConditionPreparation,
    ConditionResolution,
    PositionSplit,
    PositionsMerge,
}

impl Topic {
    /// Every topic this indexer creates, in a stable order — used to
    /// provision the stream up front so first-publish latency doesn't pay
    /// for topic creation.
    pub const fn all() -> &'static [Self] {
        &[
            Self::OrderFilled,
            Self::OrderCancelled,
            Self::TokenRegistered,
            Self::TransferSingle,
            Self::TransferBatch,
            Self::ConditionPreparation,
            Self::ConditionResolution,
            Self::PositionSplit,
            Self::PositionsMerge,
        ]
    }

    /// The topic name as registered with Iggy — identical to the event
    /// name, so operators can map one to the other at a glance.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OrderFilled => "OrderFilled",
            Self::OrderCancelled => "OrderCancelled",
            Self::TokenRegistered => "TokenRegistered",
            Self::TransferSingle => "TransferSingle",
            Self::TransferBatch => "TransferBatch",
            Self::ConditionPreparation => "ConditionPreparation",
            Self::ConditionResolution => "ConditionResolution",
            Self::PositionSplit => "PositionSplit",
            Self::PositionsMerge => "PositionsMerge",
        }
    }

    /// The topic a decoded event is published to, by its registered event
    /// name.
    ///
    /// # Panics
    ///
    /// Panics if `event_name` is not one of the nine registered event
    /// names — the Router never constructs an [`Envelope`] with any other
    /// name, so this is an invariant violation rather than a recoverable
    /// condition.
    #[must_use]
    pub fn for_event_name(event_name: &str) -> Self {
        match event_name {
            "OrderFilled" => Self::OrderFilled,
            "OrderCancelled" => Self::OrderCancelled,
            "TokenRegistered" => Self::TokenRegistered,
            "TransferSingle" => Self::TransferSingle,
            "TransferBatch" => Self::TransferBatch,
            "ConditionPreparation" => Self::ConditionPreparation,
            "ConditionResolution" => Self::ConditionResolution,
            "PositionSplit" => Self::PositionSplit,
            "PositionsMerge" => Self::PositionsMerge,
            other => panic!("unregistered event name: {other}"),
        }
    }

    /// The topic a decoded [`Envelope`] is published to.
    #[must_use]
    pub fn for_envelope(event: &Envelope) -> Self {
        Self::for_event_name(&event.event_name)
    }
}

impl std::fmt::Display for Topic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
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
            contract: EthAddress::from([0x11; 20]),
            event_name: "OrderCancelled".into(),
            event_sig: Hash32::ZERO,
            block_timestamp: 0,
            success: true,
            payload: Payload::OrderCancelled(OrderCancelled {
                order_hash: Hash32::ZERO,
            }),
        }
    }

    #[test]
    fn subject_joins_prefix_event_name_and_contract() {
        let event = sample_event();
        let subject = subject("polymarket", &event);
        assert_eq!(
            subject,
            format!("polymarket.OrderCancelled.{}", event.contract)
        );
    }

    #[test]
    fn for_envelope_matches_event_name() {
        let event = sample_event();
        assert_eq!(Topic::for_envelope(&event), Topic::OrderCancelled);
    }

    #[test]
    fn all_topics_have_distinct_names() {
        let mut seen = std::collections::HashSet::new();
        for topic in Topic::all() {
            assert!(seen.insert(topic.as_str()));
        }
        assert_eq!(seen.len(), 9);
    }

    #[test]
    fn round_trips_through_name_lookup() {
        for topic in Topic::all() {
            assert_eq!(Topic::for_event_name(topic.as_str()), *topic);
        }
    }

    #[test]
    #[should_panic(expected = "unregistered event name")]
    fn unregistered_name_panics() {
        Topic::for_event_name("NotARealEvent");
    }
}
