//! ABI bindings for the order-matching exchange contract's events.
//!
//! # Solidity Contract
//!
//! ```solidity
//! contract Exchange {
//!     event OrderFilled(bytes32 indexed orderHash, address indexed maker, address indexed taker, uint256 makerAssetId, uint256 takerAssetId, uint256 makerAmountFilled, uint256 takerAmountFilled, uint256 fee);
//!     event OrderCancelled(bytes32 indexed orderHash);
//!     event TokenRegistered(uint256 indexed token0, uint256 indexed token1, bytes32 indexed conditionId);
//! }
//! ```

use alloy::sol;

sol! {
    /// Emitted when an order is matched, in whole or in part.
    ///
    /// # Indexed Fields
    /// - `orderHash`: hash identifying the matched order
    /// - `maker`: the order's maker
    /// - `taker`: the counterparty that filled the order
    ///
    /// # Data Fields
    /// - `makerAssetId` / `takerAssetId`: asset ids exchanged
    /// - `makerAmountFilled` / `takerAmountFilled`: amounts exchanged in this fill
    /// - `fee`: protocol fee charged on the fill
    #[derive(Debug, PartialEq, Eq)]
    event OrderFilled(
        bytes32 indexed orderHash,
        address indexed maker,
        address indexed taker,
        uint256 makerAssetId,
        uint256 takerAssetId,
        uint256 makerAmountFilled,
        uint256 takerAmountFilled,
        uint256 fee
    );

    /// Emitted when a maker cancels an outstanding order.
    ///
    /// # Indexed Fields
    /// - `orderHash`: hash identifying the cancelled order
    #[derive(Debug, PartialEq, Eq)]
    event OrderCancelled(
        bytes32 indexed orderHash
    );

    /// Emitted when a new pair of complementary outcome tokens is
    /// registered against a condition.
    ///
    /// # Indexed Fields
    /// - `token0` / `token1`: asset ids of the registered pair
    /// - `conditionId`: condition the pair is registered against
    #[derive(Debug, PartialEq, Eq)]
    event TokenRegistered(
        uint256 indexed token0,
        uint256 indexed token1,
        bytes32 indexed conditionId
    );
}

#[cfg(test)]
mod tests {
    use alloy::sol_types::SolEvent;

    use super::*;

    #[test]
    fn order_filled_signature() {
        assert_eq!(
            OrderFilled::SIGNATURE,
            "OrderFilled(bytes32,address,address,uint256,uint256,uint256,uint256,uint256)"
        );
    }

    #[test]
    fn order_cancelled_signature() {
        assert_eq!(OrderCancelled::SIGNATURE, "OrderCancelled(bytes32)");
    }

    #[test]
    fn token_registered_signature() {
        assert_eq!(
            TokenRegistered::SIGNATURE,
            "TokenRegistered(uint256,uint256,bytes32)"
        );
    }

    #[test]
    fn exchange_events_have_unique_signatures() {
        let signatures = [
            OrderFilled::SIGNATURE_HASH,
            OrderCancelled::SIGNATURE_HASH,
            TokenRegistered::SIGNATURE_HASH,
        ];
        let unique: std::collections::HashSet<_> = signatures.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}
