// Configuration module entry point
// Loads layered configuration and holds the shared runtime state

mod state;
mod types;

use std::net::SocketAddr;
use std::sync::Arc;

pub use state::AppState;
pub use types::{
    Config, HealthConfig, HttpConfig, LoggingConfig, PerformanceConfig, ServerConfig,
    StorageConfig,
};

use crate::store::{DocumentStore, MemoryStore, SnapshotFile, StoreResult};

/// Environment variable prefix, e.g. `THOUGHTBOOK__SERVER__PORT=4000`
const ENV_PREFIX: &str = "THOUGHTBOOK";

impl Config {
    /// Load configuration from specified file path (without extension)
    /// Missing files are fine: environment and defaults still apply
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3001)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 30)?
            .set_default("performance.write_timeout", 30)?
            .set_default("performance.backlog", 1024)?
            .set_default("performance.shutdown_grace_period", 10)?
            .set_default("http.server_name", "thoughtbook")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1MB
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }

    /// Build the document store described by `[storage]`
    pub fn open_store(&self) -> StoreResult<Arc<dyn DocumentStore>> {
        let store = match &self.storage.snapshot_path {
            Some(path) => MemoryStore::open(SnapshotFile::new(path))?,
            None => MemoryStore::new(),
        };
        Ok(Arc::new(store))
    }
}
