//! The event envelope and the typed payloads it carries.
//!
//! An [`Envelope`] is the unit that flows Router → Publisher → broker. It is
//! immutable once constructed: the Router builds one per successfully
//! decoded log and hands it straight to the Publisher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::primitives::{Amount, BlockNumber, EthAddress, Hash32};

// ═══════════════════════════════════════════════════════════════════════════════
// ENVELOPE
// ═══════════════════════════════════════════════════════════════════════════════

/// The event envelope — the unit flowing from decoder to publisher to
/// consumer.
///
/// `(tx_hash, log_index)` is globally unique and stable across retries; it
/// forms the deduplication key the Publisher assigns to the broker message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Block the log was emitted in.
    pub block_number: BlockNumber,
    /// Hash of the block the log was emitted in.
    pub block_hash: Hash32,
    /// Hash of the transaction that emitted the log.
    pub tx_hash: Hash32,
    /// Index of the transaction within the block.
    pub tx_index: u32,
    /// Index of the log within the block.
    pub log_index: u32,
    /// Address of the contract that emitted the log.
    pub contract: EthAddress,
    /// Human-readable event name (e.g. `"OrderFilled"`).
    pub event_name: String,
    /// Event signature hash — `topics[0]` of the originating log.
    pub event_sig: Hash32,
    /// Unix timestamp (seconds) of the block the log was emitted in.
    pub block_timestamp: u64,
    /// `false` when the originating log was emitted by reverted/removed
    /// chain state (a reorg artifact observed before the Router discarded
    /// it outright).
    pub success: bool,
    /// The decoded, typed payload.
    pub payload: Payload,
}

impl Envelope {
    /// The deduplication key the Publisher assigns to the outbound message:
    /// `"{txHash}-{logIndex}"`.
    #[must_use]
    pub fn dedup_key(&self) -> String {
        format!("{}-{}", self.tx_hash.to_hex(), self.log_index)
    }

    /// The chain-order sort key within a single `ProcessBlockRange` call:
    /// `(blockNumber, txIndex, logIndex)`.
    #[must_use]
    pub const fn order_key(&self) -> (u64, u32, u32) {
        (self.block_number.get(), self.tx_index, self.log_index)
    }

    /// The block timestamp as a `DateTime<Utc>`.
    #[must_use]
    pub fn timestamp(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(i64::try_from(self.block_timestamp).unwrap_or(i64::MAX), 0)
            .unwrap_or_default()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TYPED PAYLOADS
// ═══════════════════════════════════════════════════════════════════════════════

/// The polymorphic part of an [`Envelope`]: one value per registered event
/// kind. Every integer field is arbitrary-precision non-negative unless
/// noted otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "eventName")]
pub enum Payload {
    /// An order was (partially or fully) matched by the exchange.
    OrderFilled(OrderFilled),
    /// An order was cancelled by its maker.
    OrderCancelled(OrderCancelled),
    /// A new outcome token pair was registered against a condition.
    TokenRegistered(TokenRegistered),
    /// A single conditional-token transfer (ERC-1155 `TransferSingle`).
    TransferSingle(TransferSingle),
    /// A batch conditional-token transfer (ERC-1155 `TransferBatch`).
    TransferBatch(TransferBatch),
    /// A condition was prepared against an oracle/question.
    ConditionPreparation(ConditionPreparation),
    /// A condition was resolved with final payout numerators.
    ConditionResolution(ConditionResolution),
    /// Collateral was split into a set of conditional-token positions.
    PositionSplit(PositionSplit),
    /// A set of conditional-token positions was merged back into collateral.
    PositionsMerge(PositionsMerge),
}

impl Payload {
    /// The canonical event name, matching the Router's registration key.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        match self {
            Self::OrderFilled(_) => "OrderFilled",
            Self::OrderCancelled(_) => "OrderCancelled",
            Self::TokenRegistered(_) => "TokenRegistered",
            Self::TransferSingle(_) => "TransferSingle",
            Self::TransferBatch(_) => "TransferBatch",
            Self::ConditionPreparation(_) => "ConditionPreparation",
            Self::ConditionResolution(_) => "ConditionResolution",
            Self::PositionSplit(_) => "PositionSplit",
            Self::PositionsMerge(_) => "PositionsMerge",
        }
    }
}

/// Emitted by the exchange when an order is matched, in whole or in part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderFilled {
    /// Hash identifying the order (the maker's signed order digest).
    pub order_hash: Hash32,
    /// The order's maker.
    pub maker: EthAddress,
    /// The counterparty that filled the order.
    pub taker: EthAddress,
    /// Asset id the maker is giving up (0 for the collateral asset).
    pub maker_asset_id: Amount,
    /// Asset id the taker is giving up.
    pub taker_asset_id: Amount,
    /// Amount of `makerAssetId` filled in this match.
    pub maker_amount_filled: Amount,
    /// Amount of `takerAssetId` filled in this match.
    pub taker_amount_filled: Amount,
    /// Protocol fee charged on the fill.
    pub fee: Amount,
}

/// Emitted by the exchange when a maker cancels an outstanding order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCancelled {
    /// Hash identifying the cancelled order.
    pub order_hash: Hash32,
}

/// Emitted by the exchange when a new pair of complementary outcome tokens
/// is registered against a condition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistered {
    /// Asset id of the first outcome token.
    pub token0: Amount,
    /// Asset id of the complementary outcome token.
    pub token1: Amount,
    /// Condition the pair is registered against.
    pub condition_id: Hash32,
}

/// ERC-1155 `TransferSingle`, emitted by the conditional-tokens contract
/// whenever one position id moves between holders (including mint/burn,
/// where `from`/`to` is the zero address).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferSingle {
    /// Address that initiated the transfer (may differ from `from`).
    pub operator: EthAddress,
    /// Sending address (zero address for a mint).
    pub from: EthAddress,
    /// Receiving address (zero address for a burn).
    pub to: EthAddress,
    /// Position id transferred.
    pub token_id: Amount,
    /// Amount transferred.
    pub amount: Amount,
}

/// ERC-1155 `TransferBatch` — the multi-id form of [`TransferSingle`].
///
/// Invariant: `token_ids.len() == amounts.len()`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferBatch {
    /// Address that initiated the transfer.
    pub operator: EthAddress,
    /// Sending address.
    pub from: EthAddress,
    /// Receiving address.
    pub to: EthAddress,
    /// Position ids transferred, in order.
    pub token_ids: Vec<Amount>,
    /// Amounts transferred, in the same order as `token_ids`.
    pub amounts: Vec<Amount>,
}

impl TransferBatch {
    /// Whether `token_ids` and `amounts` have equal length, per the data
    /// model invariant.
    #[must_use]
    pub fn lengths_match(&self) -> bool {
        self.token_ids.len() == self.amounts.len()
    }
}

/// Emitted when a new condition is prepared against an oracle and question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionPreparation {
    /// Id of the prepared condition.
    pub condition_id: Hash32,
    /// Oracle address responsible for eventually resolving the condition.
    pub oracle: EthAddress,
    /// Id of the question the condition answers.
    pub question_id: Hash32,
    /// Number of outcome slots. A small positive integer; values above 256
    /// are rejected by the decoder as invalid.
    pub outcome_slot_count: u16,
}

/// Emitted when a condition is resolved with its final payout numerators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConditionResolution {
    /// Id of the resolved condition.
    pub condition_id: Hash32,
    /// Oracle address that resolved the condition.
    pub oracle: EthAddress,
    /// Id of the question the condition answers.
    pub question_id: Hash32,
    /// Number of outcome slots.
    pub outcome_slot_count: u16,
    /// Relative payout weight per outcome slot, in slot order.
    pub payout_numerators: Vec<Amount>,
}

/// Emitted when collateral is split into a set of conditional-token
/// positions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionSplit {
    /// Address performing the split.
    pub stakeholder: EthAddress,
    /// ERC-20 collateral token being locked.
    pub collateral_token: EthAddress,
    /// Parent collection id (zero for a top-level split).
    pub parent_collection_id: Hash32,
    /// Condition the split is performed against.
    pub condition_id: Hash32,
    /// Index set describing which outcome slots each resulting position
    /// covers.
    pub partition: Vec<Amount>,
    /// Amount of collateral split.
    pub amount: Amount,
}

/// Emitted when a set of conditional-token positions is merged back into
/// collateral. Identical shape to [`PositionSplit`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionsMerge {
    /// Address performing the merge.
    pub stakeholder: EthAddress,
    /// ERC-20 collateral token being released.
    pub collateral_token: EthAddress,
    /// Parent collection id (zero for a top-level merge).
    pub parent_collection_id: Hash32,
    /// Condition the merge is performed against.
    pub condition_id: Hash32,
    /// Index set describing which outcome slots each merged position
    /// covered.
    pub partition: Vec<Amount>,
    /// Amount of collateral returned.
    pub amount: Amount,
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════
