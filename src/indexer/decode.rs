//! Event Decoders: pure `(rawLog, blockTimestamp) → typedPayload` functions.
//!
//! Each decoder validates the log against its expected shape, ABI-decodes
//! it via the generated [`alloy::sol!`] bindings, and maps the result into
//! a domain [`Payload`] variant with full-precision integers (§4.2).

use alloy::primitives::{Log as PrimitiveLog, LogData};
use alloy::sol_types::SolEvent;

use crate::abi::{conditional_tokens, exchange};
use crate::error::{AppError, Result};
use crate::types::events::{
    ConditionPreparation, ConditionResolution, OrderCancelled, OrderFilled, Payload, PositionSplit,
    PositionsMerge, TokenRegistered, TransferBatch, TransferSingle,
};
use crate::types::primitives::{Amount, EthAddress, Hash32};
use crate::types::raw_log::RawLog;

/// Maximum number of outcome slots a condition may declare. Above this, the
/// log is treated as malformed rather than silently truncated (§3).
const MAX_OUTCOME_SLOTS: u64 = 256;

fn decode_error(log: &RawLog, reason: impl Into<String>) -> AppError {
    AppError::DecodeError {
        tx_hash: log.tx_hash.to_hex(),
        log_index: u64::from(log.log_index),
        reason: reason.into(),
    }
}

/// Build the `alloy` primitive log `decode_log` expects from our boundary
/// type, reusing the raw topics/data verbatim.
fn to_primitive_log(log: &RawLog) -> PrimitiveLog {
    let topics: Vec<_> = log.topics.iter().map(|t| (*t).into()).collect();
    PrimitiveLog {
        address: log.address.into(),
        data: LogData::new_unchecked(topics, log.data.clone().into()),
    }
}

fn decode_event<Ev: SolEvent>(log: &RawLog) -> Result<Ev> {
    let primitive = to_primitive_log(log);
    alloy::sol_types::SolEvent::decode_log(&primitive)
        .map(|decoded| decoded.data)
        .map_err(|e| decode_error(log, format!("{}: {e}", Ev::SIGNATURE)))
}

fn amounts(values: &[alloy::primitives::U256]) -> Vec<Amount> {
    values.iter().copied().map(Amount::new).collect()
}

/// Decode an `OrderFilled` log.
pub fn order_filled(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<exchange::OrderFilled>(log)?;
    Ok(Payload::OrderFilled(OrderFilled {
        order_hash: Hash32::from(ev.orderHash),
        maker: EthAddress::from(ev.maker),
        taker: EthAddress::from(ev.taker),
        maker_asset_id: Amount::new(ev.makerAssetId),
        taker_asset_id: Amount::new(ev.takerAssetId),
        maker_amount_filled: Amount::new(ev.makerAmountFilled),
        taker_amount_filled: Amount::new(ev.takerAmountFilled),
        fee: Amount::new(ev.fee),
    }))
}

/// Decode an `OrderCancelled` log.
pub fn order_cancelled(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<exchange::OrderCancelled>(log)?;
    Ok(Payload::OrderCancelled(OrderCancelled {
        order_hash: Hash32::from(ev.orderHash),
    }))
}

/// Decode a `TokenRegistered` log.
pub fn token_registered(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<exchange::TokenRegistered>(log)?;
    Ok(Payload::TokenRegistered(TokenRegistered {
        token0: Amount::new(ev.token0),
        token1: Amount::new(ev.token1),
        condition_id: Hash32::from(ev.conditionId),
    }))
}

/// Decode a `TransferSingle` log.
pub fn transfer_single(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<conditional_tokens::TransferSingle>(log)?;
    Ok(Payload::TransferSingle(TransferSingle {
        operator: EthAddress::from(ev.operator),
        from: EthAddress::from(ev.from),
        to: EthAddress::from(ev.to),
        token_id: Amount::new(ev.id),
        amount: Amount::new(ev.value),
    }))
}

/// Decode a `TransferBatch` log.
///
/// # Errors
///
/// Returns [`AppError::DecodeError`] if `ids` and `values` have unequal
/// length (§3 invariant 5).
pub fn transfer_batch(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<conditional_tokens::TransferBatch>(log)?;
    if ev.ids.len() != ev.values.len() {
        return Err(decode_error(
            log,
            format!(
                "TransferBatch length mismatch: {} ids vs {} values",
                ev.ids.len(),
                ev.values.len()
            ),
        ));
    }
    Ok(Payload::TransferBatch(TransferBatch {
        operator: EthAddress::from(ev.operator),
        from: EthAddress::from(ev.from),
        to: EthAddress::from(ev.to),
        token_ids: amounts(&ev.ids),
        amounts: amounts(&ev.values),
    }))
}

fn outcome_slot_count(log: &RawLog, raw: alloy::primitives::U256) -> Result<u16> {
    if raw > alloy::primitives::U256::from(MAX_OUTCOME_SLOTS) {
        return Err(decode_error(
            log,
            format!("outcomeSlotCount {raw} exceeds maximum of {MAX_OUTCOME_SLOTS}"),
        ));
    }
    u16::try_from(raw.to::<u64>()).map_err(|_| decode_error(log, "outcomeSlotCount overflow"))
}

/// Decode a `ConditionPreparation` log.
///
/// # Errors
///
/// Returns [`AppError::DecodeError`] if `outcomeSlotCount` exceeds 256.
pub fn condition_preparation(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<conditional_tokens::ConditionPreparation>(log)?;
    let outcome_slot_count = outcome_slot_count(log, ev.outcomeSlotCount)?;
    Ok(Payload::ConditionPreparation(ConditionPreparation {
        condition_id: Hash32::from(ev.conditionId),
        oracle: EthAddress::from(ev.oracle),
        question_id: Hash32::from(ev.questionId),
        outcome_slot_count,
    }))
}

/// Decode a `ConditionResolution` log.
///
/// # Errors
///
/// Returns [`AppError::DecodeError`] if `outcomeSlotCount` exceeds 256.
pub fn condition_resolution(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<conditional_tokens::ConditionResolution>(log)?;
    let outcome_slot_count = outcome_slot_count(log, ev.outcomeSlotCount)?;
    Ok(Payload::ConditionResolution(ConditionResolution {
        condition_id: Hash32::from(ev.conditionId),
        oracle: EthAddress::from(ev.oracle),
        question_id: Hash32::from(ev.questionId),
        outcome_slot_count,
        payout_numerators: amounts(&ev.payoutNumerators),
    }))
}

/// Decode a `PositionSplit` log.
pub fn position_split(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<conditional_tokens::PositionSplit>(log)?;
    Ok(Payload::PositionSplit(PositionSplit {
        stakeholder: EthAddress::from(ev.stakeholder),
        collateral_token: EthAddress::from(ev.collateralToken),
        parent_collection_id: Hash32::from(ev.parentCollectionId),
        condition_id: Hash32::from(ev.conditionId),
        partition: amounts(&ev.partition),
        amount: Amount::new(ev.amount),
    }))
}

/// Decode a `PositionsMerge` log.
pub fn positions_merge(log: &RawLog) -> Result<Payload> {
    let ev = decode_event::<conditional_tokens::PositionsMerge>(log)?;
    Ok(Payload::PositionsMerge(PositionsMerge {
        stakeholder: EthAddress::from(ev.stakeholder),
        collateral_token: EthAddress::from(ev.collateralToken),
        parent_collection_id: Hash32::from(ev.parentCollectionId),
        condition_id: Hash32::from(ev.conditionId),
        partition: amounts(&ev.partition),
        amount: Amount::new(ev.amount),
    }))
}
