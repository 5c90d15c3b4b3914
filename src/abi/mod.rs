//! ABI bindings for the monitored smart contracts.
//!
//! This module provides type-safe Rust bindings for Solidity events using the
//! `alloy::sol!` macro. Each contract has its own submodule with event
//! definitions (§4.2, §9 — these are fixed constants, not generated from a
//! live ABI file; the core needs only the signature hash, the indexed-
//! parameter list, and the non-indexed tuple type per event).
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       ABI Bindings Layer                        │
//! │                                                                 │
//! │  ┌─────────────────────┐       ┌─────────────────────────────┐ │
//! │  │      exchange        │       │      conditional_tokens      │ │
//! │  │  3 events             │       │  6 events                    │ │
//! │  └─────────────────────┘       └─────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! Events are decoded from raw logs using the `SolEvent` trait:
//!
//! ```ignore
//! use alloy::sol_types::SolEvent;
//! use polymarket_indexer::abi::exchange::OrderFilled;
//!
//! let event = OrderFilled::decode_log_data(&log.data)?;
//! println!("{} filled {} of asset {}", event.maker, event.makerAmountFilled, event.makerAssetId);
//! ```
//!
//! # Contract Event Mapping
//!
//! | Contract | Module | Event Count | Description |
//! |----------|--------|-------------|-------------|
//! | Exchange | [`exchange`] | 3 | Order fills, cancellations, token pair registration |
//! | `ConditionalTokens` | [`conditional_tokens`] | 6 | ERC-1155 transfers, condition lifecycle, split/merge |

pub mod conditional_tokens;
pub mod exchange;

// Re-export all event types for convenience
pub use conditional_tokens::{
    ConditionPreparation, ConditionResolution, PositionSplit, PositionsMerge, TransferBatch,
    TransferSingle,
};
pub use exchange::{OrderCancelled, OrderFilled, TokenRegistered};

#[cfg(test)]
mod tests {
    use alloy::sol_types::SolEvent;

    use super::*;

    /// Verify that all event signature hashes are unique (no collisions).
    #[test]
    fn event_signatures_are_unique() {
        let signatures = [
            // Exchange
            OrderFilled::SIGNATURE_HASH,
            OrderCancelled::SIGNATURE_HASH,
            TokenRegistered::SIGNATURE_HASH,
            // ConditionalTokens
            TransferSingle::SIGNATURE_HASH,
            TransferBatch::SIGNATURE_HASH,
            ConditionPreparation::SIGNATURE_HASH,
            ConditionResolution::SIGNATURE_HASH,
            PositionSplit::SIGNATURE_HASH,
            PositionsMerge::SIGNATURE_HASH,
        ];

        let mut seen = std::collections::HashSet::new();
        for sig in signatures {
            assert!(
                seen.insert(sig),
                "Duplicate event signature hash detected: {sig:?}"
            );
        }

        assert_eq!(seen.len(), 9, "Expected 9 unique event signatures");
    }

    /// Verify event signature strings match expected Solidity signatures.
    #[test]
    fn event_signature_strings() {
        assert_eq!(
            OrderFilled::SIGNATURE,
            "OrderFilled(bytes32,address,address,uint256,uint256,uint256,uint256,uint256)"
        );
        assert_eq!(
            TransferSingle::SIGNATURE,
            "TransferSingle(address,address,address,uint256,uint256)"
        );
        assert_eq!(
            ConditionPreparation::SIGNATURE,
            "ConditionPreparation(bytes32,address,bytes32,uint256)"
        );
    }
}
