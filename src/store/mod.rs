//! Checkpoint persistence adapter (`PostgreSQL`).
//!
//! This module provides the concrete implementation of
//! [`crate::ports::store::CheckpointStore`]. The indexer owns exactly one
//! piece of durable state — the per-service checkpoint (§3, §4.5) — so the
//! schema here is a single narrow table, not a general-purpose data store.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        Store Adapter                            │
//! │                                                                 │
//! │   ┌──────────────────────────────────────────────────────────┐  │
//! │   │                  PostgresStore                            │  │
//! │   │              (checkpoints: one row per service)            │  │
//! │   └──────────────────────────────────────────────────────────┘  │
//! │                               │                                  │
//! │                               ▼                                  │
//! │   ┌──────────────────────────────────────────────────────────┐  │
//! │   │              SQLx Connection Pool (PostgreSQL)            │  │
//! │   └──────────────────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use polymarket_indexer::store::PostgresStore;
//! use sqlx::postgres::PgPoolOptions;
//!
//! let pool = PgPoolOptions::new()
//!     .max_connections(10)
//!     .connect("postgres://localhost/polymarket_indexer")
//!     .await?;
//!
//! let store = PostgresStore::new(pool);
//! store.run_migrations().await?;
//!
//! let checkpoint = store.get_or_create("polymarket-indexer", BlockNumber::new(0)).await?;
//! ```
//!
//! # Migrations
//!
//! Migrations live under `migrations/` and run via [`PostgresStore::run_migrations`]
//! or `sqlx migrate run`.

mod postgres;

pub use postgres::PostgresStore;

pub use sqlx::postgres::PgPool;
