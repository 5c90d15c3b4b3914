//! `alloy`-backed [`ChainReader`] adapter: a single JSON-RPC HTTP endpoint.
//!
//! Implements the three Chain Reader operations (§4.1) directly against a
//! pooled `alloy` provider. A single-endpoint implementation satisfies the
//! spec; a failover policy across multiple endpoints is an enhancement this
//! implementation does not need.

use alloy::eips::BlockNumberOrTag;
use alloy::providers::Provider;
use alloy::rpc::types::Filter;
use async_trait::async_trait;
use tracing::instrument;

use crate::error::{AppError, InfraError, Result};
use crate::ports::chain::ChainReader;
use crate::types::primitives::{BlockNumber, EthAddress, Hash32};
use crate::types::raw_log::{Header, RawLog};

/// Classifies an `alloy` transport error as Transient or Permanent per §4.1.
///
/// `alloy`'s `RpcError` carries an HTTP status (when available) and a
/// distinguishable "transport" variant for connection-level failures;
/// both are treated as retryable. A well-formed-but-rejected request
/// (e.g. an unsupported method, invalid params) is permanent.
fn classify_rpc_error(err: impl std::error::Error + Send + Sync + 'static) -> AppError {
    let message = err.to_string();
    let transient = message.contains("timed out")
        || message.contains("timeout")
        || message.contains("connection")
        || message.contains("reset")
        || message.contains("rate limit")
        || message.contains("429")
        || message.contains("500")
        || message.contains("502")
        || message.contains("503")
        || message.contains("504");
    if transient {
        AppError::Infra(InfraError::RpcTransient(Box::new(err)))
    } else {
        AppError::Infra(InfraError::RpcPermanent(Box::new(err)))
    }
}

/// A [`ChainReader`] backed by a single `alloy` HTTP provider.
///
/// Cloned cheaply: `P` is expected to be an `alloy` provider type, which
/// wraps its HTTP client in an `Arc` internally, making concurrent use from
/// the Backfill worker pool safe.
#[derive(Debug, Clone)]
pub struct AlloyChainReader<P> {
    provider: P,
}

impl<P> AlloyChainReader<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    /// Wrap an already-constructed `alloy` provider.
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P> ChainReader for AlloyChainReader<P>
where
    P: Provider + Clone + Send + Sync + 'static,
{
    #[instrument(skip(self))]
    async fn get_latest_block_number(&self) -> Result<BlockNumber> {
        let n = self
            .provider
            .get_block_number()
            .await
            .map_err(classify_rpc_error)?;
        Ok(BlockNumber::new(n))
    }

    #[instrument(skip(self))]
    async fn get_block_header(&self, n: BlockNumber) -> Result<Header> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(n.get()))
            .await
            .map_err(classify_rpc_error)?
            .ok_or_else(|| {
                AppError::Infra(InfraError::RpcPermanent(
                    format!("block {} not found", n.get()).into(),
                ))
            })?;

        Ok(Header {
            number: n,
            hash: Hash32::from(block.header.hash),
            timestamp: block.header.timestamp,
        })
    }

    #[instrument(skip(self, contracts))]
    async fn filter_logs(
        &self,
        from: BlockNumber,
        to: BlockNumber,
        contracts: &[EthAddress],
    ) -> Result<Vec<RawLog>> {
        if from.get() > to.get() {
            return Ok(Vec::new());
        }

        let addresses: Vec<alloy::primitives::Address> =
            contracts.iter().copied().map(Into::into).collect();
        let filter = Filter::new()
            .address(addresses)
            .from_block(from.get())
            .to_block(to.get());

        let logs = self
            .provider
            .get_logs(&filter)
            .await
            .map_err(classify_rpc_error)?;

        let mut raw_logs = Vec::with_capacity(logs.len());
        for log in logs {
            let block_number = log.block_number.ok_or_else(|| {
                AppError::Infra(InfraError::RpcPermanent("log missing block_number".into()))
            })?;
            let block_hash = log.block_hash.ok_or_else(|| {
                AppError::Infra(InfraError::RpcPermanent("log missing block_hash".into()))
            })?;
            let tx_hash = log.transaction_hash.ok_or_else(|| {
                AppError::Infra(InfraError::RpcPermanent(
                    "log missing transaction_hash".into(),
                ))
            })?;
            let tx_index = log.transaction_index.ok_or_else(|| {
                AppError::Infra(InfraError::RpcPermanent(
                    "log missing transaction_index".into(),
                ))
            })?;
            let log_index = log.log_index.ok_or_else(|| {
                AppError::Infra(InfraError::RpcPermanent("log missing log_index".into()))
            })?;
            let removed = log.removed;
            let address = log.address();
            let topics = log.topics().iter().map(|t| Hash32::from(*t)).collect();
            let data = log.data().data.to_vec();

            raw_logs.push(RawLog {
                block_number: BlockNumber::new(block_number),
                block_hash: Hash32::from(block_hash),
                tx_hash: Hash32::from(tx_hash),
                tx_index: u32::try_from(tx_index).unwrap_or(u32::MAX),
                log_index: u32::try_from(log_index).unwrap_or(u32::MAX),
                address: EthAddress::from(address),
                topics,
                data,
                removed,
            });
        }

        raw_logs.sort_by_key(RawLog::order_key);
        Ok(raw_logs)
    }
}
