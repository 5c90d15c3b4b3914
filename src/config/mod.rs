//! Configuration loading and validation for the Polymarket Event Indexer.
//!
//! Configuration is loaded from multiple sources in order of precedence:
//! 1. Environment variables (highest)
//! 2. Environment-specific file (e.g., `development.toml`)
//! 3. Default file (`default.toml`)
//!
//! # Example
//!
//! ```ignore
//! use polymarket_indexer::config::Settings;
//!
//! let settings = Settings::load("development")?;
//! println!("RPC URL: {}", settings.rpc.url);
//! ```

mod settings;

pub use settings::{
    ContractAddresses, DatabaseSettings, IggySettings, LoggingSettings, MetricsSettings,
    RpcSettings, Settings, SyncerSettings,
};
