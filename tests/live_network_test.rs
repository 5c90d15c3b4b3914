//! Live network integration tests against Polygon mainnet.
//!
//! These exercise the real `AlloyChainReader` adapter against a public
//! Polygon RPC endpoint — the one piece of the stack no fake or container
//! can stand in for. Ignored by default: they need outbound internet access
//! and the target chain's history, and their timing depends on a third
//! party's infrastructure.
//!
//! # Running
//!
//! ```bash
//! # Optionally point at a private endpoint for reliability:
//! export POLYGON_RPC_URL=https://your-provider/...
//!
//! cargo test --test live_network_test -- --ignored --nocapture
//! ```

use std::time::Duration;

use alloy::providers::ProviderBuilder;
use polymarket_indexer::indexer::AlloyChainReader;
use polymarket_indexer::ports::chain::ChainReader;
use polymarket_indexer::types::primitives::{BlockNumber, EthAddress};
use tokio::time::timeout;

/// Polygon mainnet chain id, matching `RpcSettings::chain_id`'s default.
const POLYGON_CHAIN_ID: u64 = 137;

/// Polymarket's CTF Exchange contract on Polygon.
const EXCHANGE_ADDRESS: &str = "0x4bFb41d5B3570DeFd03C39a9A4D8dE6Bd8B8982E";

/// Gnosis's Conditional Tokens Framework deployment on Polygon.
const CONDITIONAL_TOKENS_ADDRESS: &str = "0x4D97DCd97eC945f40cF65F87097ACe5EA0476045";

fn public_rpc_url() -> String {
    std::env::var("POLYGON_RPC_URL").unwrap_or_else(|_| "https://polygon-rpc.com".to_string())
}

fn reader() -> AlloyChainReader<impl alloy::providers::Provider + Clone + Send + Sync + 'static> {
    let url = public_rpc_url().parse().expect("valid RPC URL");
    AlloyChainReader::new(ProviderBuilder::new().connect_http(url))
}

#[tokio::test]
#[ignore = "requires network access to Polygon mainnet"]
async fn fetches_latest_block_number() {
    let reader = reader();
    let latest = timeout(Duration::from_secs(10), reader.get_latest_block_number())
        .await
        .expect("request timed out")
        .expect("RPC call failed");

    // Polygon passed this height years ago; a sane floor catches a
    // misconfigured endpoint without hardcoding a moving target.
    assert!(latest.get() > 50_000_000);
}

#[tokio::test]
#[ignore = "requires network access to Polygon mainnet"]
async fn fetches_a_known_historical_header() {
    let reader = reader();
    // An arbitrary, long-settled Polygon block.
    let header = timeout(
        Duration::from_secs(10),
        reader.get_block_header(BlockNumber::new(50_000_000)),
    )
    .await
    .expect("request timed out")
    .expect("RPC call failed");

    assert_eq!(header.number.get(), 50_000_000);
    assert!(!header.hash.is_zero());
    assert!(header.timestamp > 0);
}

#[tokio::test]
#[ignore = "requires network access to Polygon mainnet"]
async fn filters_logs_for_the_monitored_contracts() {
    let reader = reader();
    let exchange = EthAddress::from_hex(EXCHANGE_ADDRESS).expect("valid exchange address");
    let conditional_tokens =
        EthAddress::from_hex(CONDITIONAL_TOKENS_ADDRESS).expect("valid conditional tokens address");

    let latest = timeout(Duration::from_secs(10), reader.get_latest_block_number())
        .await
        .expect("request timed out")
        .expect("RPC call failed");

    // A narrow, recent window — wide enough to likely contain activity from
    // one of the two highest-traffic contracts on Polygon, narrow enough to
    // stay under most providers' log-range limits.
    let from = BlockNumber::new(latest.get().saturating_sub(500));
    let logs = timeout(
        Duration::from_secs(20),
        reader.filter_logs(from, latest, &[exchange, conditional_tokens]),
    )
    .await
    .expect("request timed out")
    .expect("RPC call failed");

    for log in &logs {
        assert!(log.address == exchange || log.address == conditional_tokens);
        assert!(log.block_number.get() >= from.get());
        assert!(log.block_number.get() <= latest.get());
    }
}

#[tokio::test]
#[ignore = "requires network access to Polygon mainnet"]
async fn reports_chain_id_matches_configured_default() {
    let url = public_rpc_url().parse().expect("valid RPC URL");
    let provider = ProviderBuilder::new().connect_http(url);
    let chain_id = timeout(
        Duration::from_secs(10),
        alloy::providers::Provider::get_chain_id(&provider),
    )
    .await
    .expect("request timed out")
    .expect("RPC call failed");

    assert_eq!(chain_id, POLYGON_CHAIN_ID);
}
