//! Polymarket Event Indexer entry point.
//!
//! Loads configuration, wires the `ChainReader`/`CheckpointStore`/`Publisher`
//! adapters, and runs the Syncer until a shutdown signal is observed.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use polymarket_indexer::config::Settings;
use polymarket_indexer::error::{AppError, InfraError, Result};
use polymarket_indexer::indexer::{AlloyChainReader, Processor, Syncer, SyncerConfig};
use polymarket_indexer::store::PostgresStore;
use polymarket_indexer::streaming::IggyPublisher;
use polymarket_indexer::types::primitives::BlockNumber;

/// Polymarket Event Indexer
#[derive(Parser, Debug)]
#[command(name = "polymarket-indexer")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Deployment environment; selects `config/{environment}.toml`.
    #[arg(short, long, env = "APP_ENV", default_value = "development")]
    environment: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let settings = match Settings::load(&args.environment) {
        Ok(settings) => settings,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&settings);

    info!(
        version = polymarket_indexer::VERSION,
        environment = %args.environment,
        "starting polymarket indexer"
    );

    if let Err(errors) = settings.validate() {
        for err in &errors {
            error!(error = %err, "invalid configuration");
        }
        return ExitCode::FAILURE;
    }

    match run(settings).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "indexer exited with error");
            ExitCode::FAILURE
        }
    }
}

/// Build the adapters, wire the Syncer, and run it until shutdown.
async fn run(settings: Settings) -> Result<()> {
    install_metrics_exporter(&settings);

    let contracts = settings
        .contracts
        .parse_all()
        .map_err(|e| AppError::Config(format!("invalid contract address: {e}")))?;

    let rpc_url = settings
        .rpc
        .url
        .parse()
        .map_err(|e| AppError::Config(format!("invalid rpc.url: {e}")))?;
    let provider = alloy::providers::ProviderBuilder::new().connect_http(rpc_url);
    let chain = Arc::new(AlloyChainReader::new(provider));

    let pool = PgPoolOptions::new()
        .max_connections(settings.database.max_connections)
        .min_connections(settings.database.min_connections)
        .acquire_timeout(settings.database.connect_timeout())
        .idle_timeout(settings.database.idle_timeout())
        .connect(&settings.database.url)
        .await
        .map_err(InfraError::Database)?;
    let store = PostgresStore::new(pool);
    store.run_migrations().await?;

    let publisher = IggyPublisher::new(&settings.iggy)?;
    publisher.connect().await?;
    let publisher = Arc::new(publisher);

    let processor = Processor::new(chain.clone(), publisher.clone(), contracts);
    let syncer_config = SyncerConfig::new(
        settings.syncer.service_name.clone(),
        BlockNumber::new(settings.syncer.start_block),
        settings.syncer.batch_size,
        settings.syncer.workers,
        settings.syncer.poll_interval(),
        settings.syncer.confirmations,
    );
    let syncer = Syncer::new(chain, store, processor, syncer_config);

    let shutdown = CancellationToken::new();
    let shutdown_waiter = shutdown.clone();
    tokio::spawn(async move {
        wait_for_shutdown_signal().await;
        shutdown_waiter.cancel();
    });

    syncer.run(shutdown).await
}

/// Install the `tracing` subscriber, honoring the configured level/format.
fn init_tracing(settings: &Settings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(settings.logging.level.clone()));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if settings.logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Start the Prometheus scrape endpoint, if enabled. Failure to bind is
/// logged and otherwise non-fatal — metrics are an observability concern,
/// not load-bearing for indexing correctness.
fn install_metrics_exporter(settings: &Settings) {
    if !settings.metrics.enabled {
        return;
    }

    let addr: std::net::SocketAddr = match settings.metrics.socket_addr().parse() {
        Ok(addr) => addr,
        Err(err) => {
            warn!(error = %err, "invalid metrics socket address, metrics disabled");
            return;
        }
    };

    if let Err(err) = metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
    {
        warn!(error = %err, "failed to install Prometheus exporter");
    } else {
        info!(%addr, "Prometheus metrics exporter listening");
    }
}

/// Wait for either Ctrl+C or, on unix, `SIGTERM`.
async fn wait_for_shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => error!(error = %err, "failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => warn!("received Ctrl+C, shutting down"),
        () = terminate => warn!("received SIGTERM, shutting down"),
    }
}
