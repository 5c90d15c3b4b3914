//! Domain types for the indexer.
//!
//! - [`primitives`] — validated newtypes (`EthAddress`, `Hash32`, `Amount`,
//!   `BlockNumber`).
//! - [`events`] — the event envelope and its typed payloads.
//! - [`raw_log`] — the Chain Reader's boundary types (`RawLog`, `Header`).
//! - [`checkpoint`] — the per-service `Checkpoint` entity.
//! - [`work_item`] — the unit of work dispatched to a Processor worker.

pub mod checkpoint;
pub mod events;
pub mod primitives;
pub mod raw_log;
pub mod work_item;

pub use checkpoint::Checkpoint;
pub use events::{
    ConditionPreparation, ConditionResolution, Envelope, OrderCancelled, OrderFilled, Payload,
    PositionSplit, PositionsMerge, TokenRegistered, TransferBatch, TransferSingle,
};
pub use primitives::{Amount, BlockNumber, EthAddress, Hash32};
pub use raw_log::{Header, RawLog};
pub use work_item::WorkItem;
