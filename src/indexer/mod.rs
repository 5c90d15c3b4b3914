//! Core indexing logic for the Polymarket event indexer.
//!
//! Five pieces cooperate to turn chain RPC calls into published events:
//!
//! - [`decode`] — pure per-event decoders over raw logs.
//! - [`event_router`] — matches a log's topic0 against the fixed event
//!   registry and dispatches to the right decoder.
//! - [`retry`] — the generic exponential-backoff primitive shared by the
//!   Processor's publish retry and the Syncer's batch retry.
//! - [`chain_reader`] — the `alloy`-backed [`crate::ports::chain::ChainReader`]
//!   adapter.
//! - [`block_processor`] — fetch → route → publish for one block or range.
//! - [`reorg_handler`] — the per-cycle canonical-chain check.
//! - [`syncer`] — the top-level state machine owning the loop.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Syncer                                │
//! │   loads checkpoint, decides Backfill vs Realtime, reorg-checks   │
//! │              every cycle, commits the checkpoint                │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 │ dispatches WorkItems
//!                                 ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Processor                                │
//! │   ChainReader.filter_logs → Router.route → Publisher.publish     │
//! └───────────────────────────────┬───────────────────────────────────┘
//!                                 │
//!               ┌─────────────────┴──────────────────┐
//!               ▼                                     ▼
//!       ┌───────────────┐                     ┌───────────────┐
//!       │  EventRouter   │                     │ event Decoders │
//!       └───────────────┘                     └───────────────┘
//! ```

pub mod block_processor;
pub mod chain_reader;
pub mod decode;
pub mod event_router;
pub mod reorg_handler;
pub mod retry;
pub mod syncer;

pub use block_processor::Processor;
pub use chain_reader::AlloyChainReader;
pub use event_router::Router;
pub use reorg_handler::ReorgCheck;
pub use retry::RetryPolicy;
pub use syncer::{Syncer, SyncerConfig, SyncerState};
