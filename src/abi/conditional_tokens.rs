//! ABI bindings for the conditional-tokens ledger contract's events.
//!
//! Covers the ERC-1155 transfer events every position-bearing token emits,
//! plus the Gnosis conditional-tokens framework's condition lifecycle and
//! collateral split/merge events.
//!
//! # Solidity Contract
//!
//! ```solidity
//! contract ConditionalTokens {
//!     event TransferSingle(address indexed operator, address indexed from, address indexed to, uint256 id, uint256 value);
//!     event TransferBatch(address indexed operator, address indexed from, address indexed to, uint256[] ids, uint256[] values);
//!     event ConditionPreparation(bytes32 indexed conditionId, address indexed oracle, bytes32 indexed questionId, uint256 outcomeSlotCount);
//!     event ConditionResolution(bytes32 indexed conditionId, address indexed oracle, bytes32 indexed questionId, uint256 outcomeSlotCount, uint256[] payoutNumerators);
//!     event PositionSplit(address indexed stakeholder, address collateralToken, bytes32 indexed parentCollectionId, bytes32 indexed conditionId, uint256[] partition, uint256 amount);
//!     event PositionsMerge(address indexed stakeholder, address collateralToken, bytes32 indexed parentCollectionId, bytes32 indexed conditionId, uint256[] partition, uint256 amount);
//! }
//! ```

use alloy::sol;

sol! {
    /// ERC-1155 single transfer. Fired for every position-id movement,
    /// including mint (`from` = zero address) and burn (`to` = zero
    /// address).
    ///
    /// # Indexed Fields
    /// - `operator`, `from`, `to`
    ///
    /// # Data Fields
    /// - `id`: position id
    /// - `value`: amount transferred
    #[derive(Debug, PartialEq, Eq)]
    event TransferSingle(
        address indexed operator,
        address indexed from,
        address indexed to,
        uint256 id,
        uint256 value
    );

    /// ERC-1155 batch transfer — the multi-id form of `TransferSingle`.
    ///
    /// # Indexed Fields
    /// - `operator`, `from`, `to`
    ///
    /// # Data Fields
    /// - `ids` / `values`: parallel arrays of equal length
    #[derive(Debug, PartialEq, Eq)]
    event TransferBatch(
        address indexed operator,
        address indexed from,
        address indexed to,
        uint256[] ids,
        uint256[] values
    );

    /// Emitted when a new condition is prepared against an oracle and
    /// question.
    ///
    /// # Indexed Fields
    /// - `conditionId`, `oracle`, `questionId`
    ///
    /// # Data Fields
    /// - `outcomeSlotCount`
    #[derive(Debug, PartialEq, Eq)]
    event ConditionPreparation(
        bytes32 indexed conditionId,
        address indexed oracle,
        bytes32 indexed questionId,
        uint256 outcomeSlotCount
    );

    /// Emitted when a condition is resolved with its final payout
    /// numerators.
    ///
    /// # Indexed Fields
    /// - `conditionId`, `oracle`, `questionId`
    ///
    /// # Data Fields
    /// - `outcomeSlotCount`
    /// - `payoutNumerators`: relative payout weight per outcome slot
    #[derive(Debug, PartialEq, Eq)]
    event ConditionResolution(
        bytes32 indexed conditionId,
        address indexed oracle,
        bytes32 indexed questionId,
        uint256 outcomeSlotCount,
        uint256[] payoutNumerators
    );

    /// Emitted when collateral is split into a set of conditional-token
    /// positions.
    ///
    /// # Indexed Fields
    /// - `stakeholder`, `parentCollectionId`, `conditionId`
    ///
    /// # Data Fields
    /// - `collateralToken`
    /// - `partition`: index set describing which outcome slots each
    ///   resulting position covers
    /// - `amount`
    #[derive(Debug, PartialEq, Eq)]
    event PositionSplit(
        address indexed stakeholder,
        address collateralToken,
        bytes32 indexed parentCollectionId,
        bytes32 indexed conditionId,
        uint256[] partition,
        uint256 amount
    );

    /// Emitted when a set of conditional-token positions is merged back
    /// into collateral. Identical shape to `PositionSplit`.
    #[derive(Debug, PartialEq, Eq)]
    event PositionsMerge(
        address indexed stakeholder,
        address collateralToken,
        bytes32 indexed parentCollectionId,
        bytes32 indexed conditionId,
        uint256[] partition,
        uint256 amount
    );
}
