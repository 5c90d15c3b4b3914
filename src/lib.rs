//! Polymarket Event Indexer
//!
//! A Rust backend service that indexes two EVM contracts behind the
//! Polymarket order book — the order-matching Exchange and the Gnosis
//! Conditional Tokens ledger — and republishes every log as a typed,
//! deduplicated event on a durable broker.
//!
//! # Architecture
//!
//! The indexer follows a hexagonal architecture: a single Syncer state
//! machine owns the checkpoint and the mode transitions, dispatching to a
//! stateless Batch Processor over three ports (`ChainReader`,
//! `CheckpointStore`, `Publisher`).
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                            Syncer                                │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────┐          │
//! │  │    Batch     │  │    Event     │  │    Event     │          │
//! │  │  Processor   │─▶│    Router    │─▶│  Decoders    │          │
//! │  └──────────────┘  └──────────────┘  └──────────────┘          │
//! │         │                                    │                  │
//! │         ▼                                    ▼                  │
//! │  ┌──────────────┐                     ┌──────────────┐          │
//! │  │ ChainReader  │                     │  Publisher   │          │
//! │  └──────────────┘                     └──────────────┘          │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Domain types (events, entities, primitives)
//! - [`error`] - Layered error types
//! - [`config`] - Configuration loading and validation
//! - [`abi`] - ABI bindings for the Exchange and Conditional Tokens contracts
//! - [`ports`] - `ChainReader`/`CheckpointStore`/`Publisher`/`Clock` traits
//! - [`indexer`] - Core indexing logic (decoders, router, processor, syncer)
//! - [`store`] - Checkpoint persistence (`PostgreSQL`)
//! - [`streaming`] - Apache Iggy integration
//!
//! # Getting Started
//!
//! ```bash
//! # Set up environment
//! cp .env.example .env
//! # Edit .env with your configuration
//!
//! # Run migrations
//! sqlx migrate run
//!
//! # Start the indexer
//! cargo run -- --environment production
//! ```

#![doc(html_root_url = "https://docs.rs/polymarket-indexer")]

pub mod abi;
pub mod config;
pub mod error;
pub mod indexer;
pub mod ports;
pub mod store;
pub mod streaming;
pub mod types;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Returns the library version string
#[must_use]
pub const fn version() -> &'static str {
    VERSION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!version().is_empty());
        assert!(version().starts_with("0."));
    }
}
