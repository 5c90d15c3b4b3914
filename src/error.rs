//! Layered error types for the indexer.
//!
//! The hierarchy mirrors the error-kind taxonomy the Syncer, Processor and
//! Publisher all reason about:
//!
//! - [`InfraError`] - failures from an adapter (RPC, database, broker), each
//!   tagged with the policy the caller should apply.
//! - [`AppError`] - the crate-wide error type; wraps [`InfraError`] and adds
//!   the indexer-specific conditions (`ReorgDetected`, `DecodeError`,
//!   `NoHandler`) that don't originate from a single adapter call.
//!
//! # Error Philosophy
//!
//! Every fallible operation is classified as one of:
//!
//! - `Transient` - retry at the call site (network blip, rate limit, broker
//!   hiccup). Never terminates the process by itself.
//! - `Permanent` - configuration or protocol-level failure; propagates until
//!   something terminates the process.
//! - `DecodeError` / `NoHandler` - scoped to a single log; absorbed by the
//!   Processor, never propagated past `ProcessBlockRange`.
//! - `ReorgDetected` - handled by the Syncer's rewind logic, never surfaced
//!   past a single cycle.

use thiserror::Error;

// ═══════════════════════════════════════════════════════════════════════════════
// INFRASTRUCTURE ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Infrastructure-level errors from external systems (chain RPC, checkpoint
/// store, durable publisher).
///
/// Each variant is pre-classified so callers don't need to pattern-match on
/// the source error to decide whether to retry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InfraError {
    /// Network/timeout/rate-limit failure talking to the chain RPC endpoint.
    /// Callers should retry with backoff.
    #[error("RPC error (transient): {0}")]
    RpcTransient(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// RPC responded but with a malformed/unexpected result. Not retryable.
    #[error("RPC error (permanent): {0}")]
    RpcPermanent(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Checkpoint store error (database unreachable, constraint violation).
    #[error("checkpoint store error: {0}")]
    Database(#[from] sqlx::Error),

    /// Durable publisher rejected the message transiently (broker
    /// unreachable, stream not ready).
    #[error("publisher error (transient): {0}")]
    PublishTransient(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Durable publisher rejected the message permanently (payload too
    /// large, invalid stream configuration).
    #[error("publisher error (permanent): {0}")]
    PublishPermanent(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// JSON serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration file error.
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// Contract address string failed to parse.
    #[error("address parsing error: {0}")]
    AddressParsing(String),

    /// Catch-all for adapter failures that don't fit the above, always
    /// treated as permanent.
    #[error("internal error: {0}")]
    Internal(String),
}

impl InfraError {
    /// Whether the caller should retry the operation that produced this
    /// error, per the §7 Transient/Permanent split.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::RpcTransient(_) | Self::PublishTransient(_))
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// APPLICATION ERRORS
// ═══════════════════════════════════════════════════════════════════════════════

/// Crate-wide error type.
///
/// This is the primary error type used throughout the application.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppError {
    /// Infrastructure error from a chain/database/broker adapter.
    #[error(transparent)]
    Infra(#[from] InfraError),

    /// A single log failed to decode; carries enough context to log and
    /// skip it without aborting the batch.
    #[error("decode error for tx={tx_hash} log_index={log_index}: {reason}")]
    DecodeError {
        /// Transaction hash of the offending log.
        tx_hash: String,
        /// Log index of the offending log.
        log_index: u64,
        /// Human-readable decode failure reason.
        reason: String,
    },

    /// A log's signature hash is not registered with the Router. Not an
    /// error condition by itself — surfaced as a typed value so callers can
    /// distinguish "nothing to do" from "something went wrong" without
    /// resorting to sentinel values.
    #[error("no handler registered for signature {0}")]
    NoHandler(String),

    /// The checkpointed head no longer matches the canonical chain.
    #[error("chain reorg detected: checkpoint at block {block} no longer canonical")]
    ReorgDetected {
        /// The checkpointed block number that diverged.
        block: u64,
    },

    /// Configuration failed validation at startup.
    #[error("configuration error: {0}")]
    Config(String),

    /// Graceful shutdown was requested and is propagating up the call stack.
    #[error("shutdown requested")]
    ShutdownRequested,
}

impl AppError {
    /// Whether the underlying cause is transient and the caller's retry loop
    /// should run again.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Infra(infra) if infra.is_retryable())
    }
}

/// Type alias for application Results.
pub type Result<T> = std::result::Result<T, AppError>;

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
