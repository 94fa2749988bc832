//! Server configuration read from the environment

use std::net::SocketAddr;
use std::path::PathBuf;

use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8081";
pub const DEFAULT_LOG_FILTER: &str = "api_server=debug,taskdesk_core=info,tower_http=debug";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid TASKDESK_ADDR '{value}': {source}")]
    InvalidAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
}

/// Which store implementation backs the API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    File,
}

impl StoreBackend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// JSON snapshot file; the store is purely in-memory when unset
    pub data_file: Option<PathBuf>,
    /// Load the demo tasks into an empty store
    pub seed_demo: bool,
}

impl ServerConfig {
    /// Read `TASKDESK_ADDR`, `TASKDESK_DATA_FILE` and `TASKDESK_SEED_DEMO`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let raw_addr = lookup("TASKDESK_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = raw_addr
            .trim()
            .parse()
            .map_err(|source| ConfigError::InvalidAddr {
                value: raw_addr.clone(),
                source,
            })?;

        let data_file = lookup("TASKDESK_DATA_FILE")
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .map(PathBuf::from);

        Ok(Self {
            addr,
            data_file,
            seed_demo: flag(lookup("TASKDESK_SEED_DEMO"), true),
        })
    }

    pub fn backend(&self) -> StoreBackend {
        if self.data_file.is_some() {
            StoreBackend::File
        } else {
            StoreBackend::Memory
        }
    }
}

fn flag(raw: Option<String>, default: bool) -> bool {
    match raw {
        Some(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        None => default,
    }
}
