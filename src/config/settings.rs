//! Settings structs and loading logic.
//!
//! All settings have sensible defaults and can be overridden via
//! environment variables or configuration files.

use std::path::Path;
use std::time::Duration;

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Ethereum RPC configuration.
    pub rpc: RpcSettings,
    /// Database configuration (checkpoint store).
    pub database: DatabaseSettings,
    /// Apache Iggy streaming configuration.
    pub iggy: IggySettings,
    /// Syncer tuning knobs (§4.7).
    pub syncer: SyncerSettings,
    /// Logging configuration.
    pub logging: LoggingSettings,
    /// Metrics configuration.
    pub metrics: MetricsSettings,
    /// Monitored smart contract addresses.
    pub contracts: ContractAddresses,
}

impl Settings {
    /// Load settings from configuration files and environment variables.
    ///
    /// Files are loaded in this order (later overrides earlier):
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (if exists)
    /// 3. Environment variables with `INDEXER_` prefix
    ///
    /// # Arguments
    /// * `environment` - Environment name (e.g., "development", "production")
    ///
    /// # Errors
    /// Returns `ConfigError` if configuration is invalid or cannot be loaded.
    pub fn load(environment: &str) -> Result<Self, ConfigError> {
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".into());

        let builder = Config::builder()
            // Start with default values
            .set_default("rpc.url", "http://localhost:8545")?
            .set_default("rpc.ws_url", "ws://localhost:8546")?
            .set_default("rpc.chain_id", 137)?
            .set_default("rpc.poll_interval_ms", 1000)?
            .set_default("rpc.max_retries", 3)?
            .set_default("rpc.retry_delay_ms", 1000)?
            .set_default("rpc.request_timeout_ms", 30000)?
            .set_default("rpc.batch_size", 100)?
            .set_default("database.url", "postgres://localhost/polymarket_indexer")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 1)?
            .set_default("database.connect_timeout_ms", 5000)?
            .set_default("database.idle_timeout_ms", 600_000)?
            .set_default("iggy.url", "tcp://localhost:8090")?
            .set_default("iggy.stream_name", "polymarket-indexer")?
            .set_default("iggy.partition_count", 3)?
            .set_default("iggy.replication_factor", 1)?
            .set_default("iggy.username", "iggy")?
            .set_default("iggy.password", "iggy")?
            .set_default("syncer.service_name", "polymarket-indexer")?
            .set_default("syncer.start_block", 0)?
            .set_default("syncer.batch_size", 500)?
            .set_default("syncer.workers", 4)?
            .set_default("syncer.poll_interval_ms", 2000)?
            .set_default("syncer.confirmations", 5)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "json")?
            .set_default("logging.file_path", Option::<String>::None)?
            .set_default("metrics.enabled", true)?
            .set_default("metrics.host", "0.0.0.0")?
            .set_default("metrics.port", 9090)?
            // Contract addresses - these MUST be set in production config
            .set_default(
                "contracts.exchange",
                "0x0000000000000000000000000000000000000001",
            )?
            .set_default(
                "contracts.conditional_tokens",
                "0x0000000000000000000000000000000000000002",
            )?
            // Load default configuration file
            .add_source(File::with_name(&format!("{config_dir}/default")).required(false))
            // Load environment-specific file
            .add_source(File::with_name(&format!("{config_dir}/{environment}")).required(false))
            // Override with environment variables (INDEXER_ prefix)
            .add_source(
                Environment::with_prefix("INDEXER")
                    .separator("__")
                    .try_parsing(true),
            );

        builder.build()?.try_deserialize()
    }

    /// Load settings from a specific file path.
    ///
    /// # Errors
    /// Returns `ConfigError` if the file cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()?
            .try_deserialize()
    }

    /// Validate settings and return any validation errors.
    ///
    /// # Errors
    /// Returns a list of validation error messages.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        // RPC validation
        if self.rpc.url.is_empty() {
            errors.push("rpc.url cannot be empty".into());
        }
        if self.rpc.chain_id == 0 {
            errors.push("rpc.chain_id must be non-zero".into());
        }
        if self.rpc.batch_size == 0 {
            errors.push("rpc.batch_size must be non-zero".into());
        }

        // Database validation
        if self.database.url.is_empty() {
            errors.push("database.url cannot be empty".into());
        }
        if self.database.max_connections == 0 {
            errors.push("database.max_connections must be non-zero".into());
        }
        if self.database.min_connections > self.database.max_connections {
            errors.push("database.min_connections cannot exceed max_connections".into());
        }

        // Syncer validation
        if self.syncer.batch_size == 0 {
            errors.push("syncer.batch_size must be non-zero".into());
        }
        if self.syncer.workers == 0 {
            errors.push("syncer.workers must be non-zero".into());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Ethereum RPC configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcSettings {
    /// HTTP RPC endpoint URL.
    pub url: String,
    /// WebSocket RPC endpoint URL (unused by the core sync loop, reserved
    /// for a future subscription-based realtime mode).
    pub ws_url: String,
    /// Chain ID (for validation).
    pub chain_id: u64,
    /// Polling interval in milliseconds.
    pub poll_interval_ms: u64,
    /// Maximum retry attempts for failed requests.
    pub max_retries: u32,
    /// Delay between retries in milliseconds.
    pub retry_delay_ms: u64,
    /// Request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Number of logs to fetch per request.
    pub batch_size: u64,
}

impl RpcSettings {
    /// Get the polling interval as a `Duration`.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get the retry delay as a `Duration`.
    #[must_use]
    pub const fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// Get the request timeout as a `Duration`.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum connections in the pool.
    pub max_connections: u32,
    /// Minimum connections to maintain.
    pub min_connections: u32,
    /// Connection timeout in milliseconds.
    pub connect_timeout_ms: u64,
    /// Idle connection timeout in milliseconds.
    pub idle_timeout_ms: u64,
}

impl DatabaseSettings {
    /// Get the connection timeout as a `Duration`.
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    /// Get the idle timeout as a `Duration`.
    #[must_use]
    pub const fn idle_timeout(&self) -> Duration {
        Duration::from_millis(self.idle_timeout_ms)
    }
}

/// Apache Iggy streaming configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IggySettings {
    /// Iggy server URL.
    pub url: String,
    /// Stream name events are published under.
    pub stream_name: String,
    /// Number of partitions per topic.
    pub partition_count: u32,
    /// Replication factor.
    pub replication_factor: u32,
    /// Username for authentication.
    pub username: String,
    /// Password for authentication.
    pub password: String,
}

/// Syncer tuning knobs (§4.7's Configuration list).
#[derive(Debug, Clone, Deserialize)]
pub struct SyncerSettings {
    /// Primary key under which the checkpoint is stored.
    pub service_name: String,
    /// Block to start from when no checkpoint exists yet.
    pub start_block: u64,
    /// Blocks per Backfill batch.
    pub batch_size: u64,
    /// Backfill worker-pool size.
    pub workers: usize,
    /// Delay between Realtime polls, in milliseconds.
    pub poll_interval_ms: u64,
    /// Blocks behind the chain head considered final.
    pub confirmations: u64,
}

impl SyncerSettings {
    /// Get the poll interval as a `Duration`.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error).
    pub level: String,
    /// Log format (json, pretty).
    pub format: String,
    /// Optional file path for log output.
    pub file_path: Option<String>,
}

/// Metrics configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSettings {
    /// Whether metrics are enabled.
    pub enabled: bool,
    /// Host to bind metrics server to.
    pub host: String,
    /// Port for metrics server.
    pub port: u16,
}

impl MetricsSettings {
    /// Get the metrics socket address string.
    #[must_use]
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The two smart contracts this indexer monitors (§1).
#[derive(Debug, Clone, Deserialize)]
pub struct ContractAddresses {
    /// The order-matching Exchange contract.
    pub exchange: String,
    /// The Gnosis Conditional Tokens contract.
    pub conditional_tokens: String,
}

impl ContractAddresses {
    /// Both addresses, in filter order.
    #[must_use]
    pub fn all(&self) -> Vec<&str> {
        vec![&self.exchange, &self.conditional_tokens]
    }

    /// Parse both addresses into domain [`EthAddress`](crate::types::primitives::EthAddress) values.
    ///
    /// # Errors
    /// Returns an error if either address is invalid hex.
    pub fn parse_all(
        &self,
    ) -> std::result::Result<
        Vec<crate::types::primitives::EthAddress>,
        crate::types::primitives::InvalidAddress,
    > {
        self.all()
            .into_iter()
            .map(crate::types::primitives::EthAddress::from_hex)
            .collect()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// TESTS
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn rpc_durations() {
        let rpc = RpcSettings {
            url: "http://localhost:8545".into(),
            ws_url: "ws://localhost:8546".into(),
            chain_id: 137,
            poll_interval_ms: 1000,
            max_retries: 3,
            retry_delay_ms: 500,
            request_timeout_ms: 30000,
            batch_size: 100,
        };

        assert_eq!(rpc.poll_interval(), Duration::from_millis(1000));
        assert_eq!(rpc.retry_delay(), Duration::from_millis(500));
        assert_eq!(rpc.request_timeout(), Duration::from_millis(30000));
    }

    #[test]
    fn syncer_poll_interval() {
        let syncer = SyncerSettings {
            service_name: "polymarket-indexer".into(),
            start_block: 0,
            batch_size: 500,
            workers: 4,
            poll_interval_ms: 2000,
            confirmations: 5,
        };
        assert_eq!(syncer.poll_interval(), Duration::from_millis(2000));
    }

    #[test]
    fn contract_addresses_parse() {
        let contracts = ContractAddresses {
            exchange: "0x0000000000000000000000000000000000000001".into(),
            conditional_tokens: "0x0000000000000000000000000000000000000002".into(),
        };
        let parsed = contracts.parse_all().unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn validation_catches_zero_connections() {
        let mut settings = create_valid_settings();
        settings.database.max_connections = 0;

        let result = settings.validate();
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert!(errors.iter().any(|e| e.contains("max_connections")));
    }

    #[test]
    fn validation_catches_min_exceeds_max() {
        let mut settings = create_valid_settings();
        settings.database.min_connections = 20;
        settings.database.max_connections = 10;

        let result = settings.validate();
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert!(errors.iter().any(|e| e.contains("min_connections")));
    }

    #[test]
    fn validation_catches_zero_workers() {
        let mut settings = create_valid_settings();
        settings.syncer.workers = 0;

        let result = settings.validate();
        assert!(result.is_err());
        let errors = result.unwrap_err();
        assert!(errors.iter().any(|e| e.contains("workers")));
    }

    fn create_valid_settings() -> Settings {
        Settings {
            rpc: RpcSettings {
                url: "http://localhost:8545".into(),
                ws_url: "ws://localhost:8546".into(),
                chain_id: 137,
                poll_interval_ms: 1000,
                max_retries: 3,
                retry_delay_ms: 1000,
                request_timeout_ms: 30000,
                batch_size: 100,
            },
            database: DatabaseSettings {
                url: "postgres://localhost/test".into(),
                max_connections: 10,
                min_connections: 1,
                connect_timeout_ms: 5000,
                idle_timeout_ms: 600_000,
            },
            iggy: IggySettings {
                url: "tcp://localhost:8090".into(),
                stream_name: "polymarket-indexer".into(),
                partition_count: 3,
                replication_factor: 1,
                username: "iggy".into(),
                password: "iggy".into(),
            },
            syncer: SyncerSettings {
                service_name: "polymarket-indexer".into(),
                start_block: 0,
                batch_size: 500,
                workers: 4,
                poll_interval_ms: 2000,
                confirmations: 5,
            },
            logging: LoggingSettings {
                level: "info".into(),
                format: "json".into(),
                file_path: None,
            },
            metrics: MetricsSettings {
                enabled: true,
                host: "0.0.0.0".into(),
                port: 9090,
            },
            contracts: ContractAddresses {
                exchange: "0x0000000000000000000000000000000000000001".into(),
                conditional_tokens: "0x0000000000000000000000000000000000000002".into(),
            },
        }
    }
}
