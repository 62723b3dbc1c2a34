//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `RELATE_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use crate::classifier::ThresholdUpdates;
use crate::constants::{DEFAULT_CACHE_CAPACITY, DEFAULT_PORT};

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `RELATE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `7871`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Bi-encoder model directory (BERT + tokenizer). `None` runs the stub encoder.
    pub embedder_path: Option<PathBuf>,

    /// Cross-encoder model directory (BERT classifier + tokenizer). `None` runs the stub scorer.
    pub reranker_path: Option<PathBuf>,

    /// Max entries in each retriever cache. Default: `10_000`.
    pub cache_capacity: u64,

    /// Instruction prepended to queries before bi-encoding.
    pub query_instruction: Option<String>,

    /// Threshold overrides applied to the default chain at startup.
    pub thresholds: ThresholdUpdates,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            embedder_path: None,
            reranker_path: None,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            query_instruction: None,
            thresholds: ThresholdUpdates::new(),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "RELATE_PORT";
    const ENV_BIND_ADDR: &'static str = "RELATE_BIND_ADDR";
    const ENV_EMBEDDER_PATH: &'static str = "RELATE_EMBEDDER_PATH";
    const ENV_RERANKER_PATH: &'static str = "RELATE_RERANKER_PATH";
    const ENV_CACHE_CAPACITY: &'static str = "RELATE_CACHE_CAPACITY";
    const ENV_QUERY_INSTRUCTION: &'static str = "RELATE_QUERY_INSTRUCTION";
    const ENV_THRESHOLDS: &'static str = "RELATE_THRESHOLDS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let embedder_path = Self::parse_optional_path_from_env(Self::ENV_EMBEDDER_PATH);
        let reranker_path = Self::parse_optional_path_from_env(Self::ENV_RERANKER_PATH);
        let cache_capacity = Self::parse_capacity_from_env(defaults.cache_capacity)?;
        let query_instruction = Self::parse_optional_string_from_env(Self::ENV_QUERY_INSTRUCTION);
        let thresholds = Self::parse_thresholds_from_env()?;

        Ok(Self {
            port,
            bind_addr,
            embedder_path,
            reranker_path,
            cache_capacity,
            query_instruction,
            thresholds,
        })
    }

    /// Validates model paths (does not load anything).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [&self.embedder_path, &self.reranker_path].into_iter().flatten() {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_dir() {
                return Err(ConfigError::NotADirectory { path: path.clone() });
            }
        }

        Ok(())
    }

    /// Address the server binds to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_capacity_from_env(default: u64) -> Result<u64, ConfigError> {
        match env::var(Self::ENV_CACHE_CAPACITY) {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(capacity) if capacity > 0 => Ok(capacity),
                _ => Err(ConfigError::InvalidCacheCapacity { value }),
            },
            Err(_) => Ok(default),
        }
    }

    fn parse_thresholds_from_env() -> Result<ThresholdUpdates, ConfigError> {
        match Self::parse_optional_string_from_env(Self::ENV_THRESHOLDS) {
            Some(value) => serde_json::from_str(&value)
                .map_err(|e| ConfigError::InvalidThresholds { value, source: e }),
            None => Ok(ThresholdUpdates::new()),
        }
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        Self::parse_optional_string_from_env(var_name).map(PathBuf::from)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}
